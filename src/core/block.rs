//! Explicitly stored byte ranges
//!
//! A block owns the bytes for the half-open interval `[offset, offset + len)`.
//! Everything not covered by a block reads back as zero.

use crate::error::{Result, StreamError};
use serde::{Deserialize, Serialize};

/// A contiguous run of stored bytes at a fixed offset
///
/// The buffer is taken by value: once handed to a stream, the caller can no
/// longer mutate it, and no copy is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    offset: u64,
    data: Vec<u8>,
}

impl Block {
    /// Create a block that takes ownership of `data`
    pub fn new(offset: u64, data: Vec<u8>) -> Self {
        Block { offset, data }
    }

    /// Create a block by copying borrowed bytes
    pub fn from_slice(offset: u64, data: &[u8]) -> Self {
        Block::new(offset, data.to_vec())
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give the backing buffer back to the caller
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// End of the block (exclusive)
    ///
    /// Fails if the block would extend past the 64-bit address space.
    pub fn checked_end(&self) -> Result<u64> {
        self.offset.checked_add(self.len()).ok_or_else(|| {
            StreamError::InvalidArgument(format!(
                "block at offset {} with {} bytes exceeds the addressable range",
                self.offset,
                self.len()
            ))
        })
    }

    /// End of the block (exclusive)
    ///
    /// Only valid for blocks already accepted into a block list, whose end
    /// was checked on the way in.
    pub(crate) fn end(&self) -> u64 {
        self.offset + self.len()
    }

    /// Check if this block stores the byte at `pos`
    pub fn contains(&self, pos: u64) -> bool {
        pos >= self.offset && pos - self.offset < self.len()
    }

    /// Check if two blocks share at least one byte
    ///
    /// Works on unvalidated blocks too: no end offset is ever computed.
    pub fn overlaps(&self, other: &Block) -> bool {
        (!other.is_empty() && self.contains(other.offset))
            || (!self.is_empty() && other.contains(self.offset))
    }

    /// Cut the block down to `len` bytes
    pub(crate) fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    pub fn span(&self) -> BlockSpan {
        BlockSpan {
            offset: self.offset,
            len: self.len(),
        }
    }
}

/// Extent of a stored block, without its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpan {
    pub offset: u64,
    pub len: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_creation() {
        let block = Block::new(10, vec![1, 2, 3]);
        assert_eq!(block.offset(), 10);
        assert_eq!(block.len(), 3);
        assert_eq!(block.end(), 13);
        assert_eq!(block.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_block_contains() {
        let block = Block::new(10, vec![0; 20]);
        assert!(!block.contains(9));
        assert!(block.contains(10));
        assert!(block.contains(29));
        assert!(!block.contains(30));
    }

    #[test]
    fn test_block_overlap() {
        let a = Block::new(0, vec![0; 16]);
        let b = Block::new(12, vec![0; 16]);
        let c = Block::new(16, vec![0; 16]);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching is not overlapping
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_block_past_address_space_queries() {
        // Never accepted by a block list, but the queries must not overflow
        let high = Block::new(u64::MAX, vec![0; 2]);
        assert!(high.contains(u64::MAX));
        assert!(!high.contains(u64::MAX - 1));

        let below = Block::new(u64::MAX - 1, vec![0; 4]);
        assert!(high.overlaps(&below));
        assert!(below.overlaps(&high));

        let empty = Block::new(u64::MAX, Vec::new());
        assert!(!empty.contains(u64::MAX));
        assert!(!empty.overlaps(&high));
        assert!(!high.overlaps(&empty));
    }

    #[test]
    fn test_checked_end_overflow() {
        let block = Block::new(u64::MAX - 1, vec![0; 4]);
        assert!(matches!(
            block.checked_end(),
            Err(StreamError::InvalidArgument(_))
        ));

        let block = Block::new(u64::MAX - 4, vec![0; 4]);
        assert_eq!(block.checked_end().unwrap(), u64::MAX);
    }

    #[test]
    fn test_from_slice_copies() {
        let source = [7u8; 4];
        let block = Block::from_slice(100, &source);
        assert_eq!(block.span(), BlockSpan { offset: 100, len: 4 });
        assert_eq!(block.into_data(), vec![7u8; 4]);
    }
}

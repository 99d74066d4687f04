//! Ordered, non-overlapping block storage
//!
//! `BlockList` owns the blocks of a sparse stream and keeps them sorted by
//! offset with no two blocks sharing a byte. Touching blocks are allowed and
//! are never merged.
//!
//! Lookup is a linear scan from the front. Callers only go through
//! [`BlockList::locate`], so the backing `Vec` can be swapped for an interval
//! tree without changing the stream code.

use crate::block::{Block, BlockSpan};
use crate::error::{Result, StreamError};
use tracing::{trace, warn};

#[derive(Debug, Clone, Default)]
pub struct BlockList {
    /// Blocks sorted by offset
    blocks: Vec<Block>,
}

impl BlockList {
    pub fn new() -> Self {
        BlockList { blocks: Vec::new() }
    }

    /// Build a validated list from blocks in any order
    ///
    /// Returns the list together with the final stream length. A `length` of
    /// zero means "end of the last block".
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a block runs past `u64::MAX`, or `length` is
    ///   non-zero and shorter than the end of the last block
    /// - `Overlap` if two blocks share a byte
    pub fn from_blocks<I>(blocks: I, length: u64) -> Result<(Self, u64)>
    where
        I: IntoIterator<Item = Block>,
    {
        let mut list = BlockList::new();
        for block in blocks {
            list.insert_sorted(block)?;
        }

        let extent = list.extent();
        let length = if length == 0 {
            extent
        } else if length < extent {
            return Err(StreamError::InvalidArgument(format!(
                "length {} is shorter than the stored extent {}",
                length, extent
            )));
        } else {
            length
        };

        list.debug_assert_invariants(length);
        Ok((list, length))
    }

    /// Insert a block at its sorted position, rejecting overlaps
    fn insert_sorted(&mut self, block: Block) -> Result<()> {
        let end = block.checked_end()?;

        // Ties on offset put the shorter block first, so an empty block never
        // lands after a block starting at the same offset.
        let index = self
            .blocks
            .iter()
            .position(|existing| {
                existing.offset() > block.offset()
                    || (existing.offset() == block.offset() && existing.len() > block.len())
            })
            .unwrap_or(self.blocks.len());

        if let Some(next) = self.blocks.get(index) {
            if end > next.offset() {
                return Err(self.overlap(index, &block));
            }
        }
        if index > 0 {
            let prev = &self.blocks[index - 1];
            if prev.end() > block.offset() {
                return Err(self.overlap(index - 1, &block));
            }
        }

        self.blocks.insert(index, block);
        Ok(())
    }

    fn overlap(&self, existing_index: usize, block: &Block) -> StreamError {
        let existing_offset = self.blocks[existing_index].offset();
        warn!(
            "Rejecting block at offset {} ({} bytes): overlaps block {} at offset {}",
            block.offset(),
            block.len(),
            existing_index,
            existing_offset
        );
        StreamError::Overlap {
            existing_index,
            existing_offset,
            offset: block.offset(),
        }
    }

    /// Index of the first block that ends after `pos`
    ///
    /// Blocks before this index lie entirely behind `pos`. Returns `len()` if
    /// no block ends after `pos`.
    pub fn locate(&self, pos: u64) -> usize {
        self.blocks
            .iter()
            .position(|block| block.end() > pos)
            .unwrap_or(self.blocks.len())
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Insert a block directly before `index`
    ///
    /// The caller guarantees the block fits in the gap in front of `index`.
    pub(crate) fn insert_at(&mut self, index: usize, block: Block) {
        trace!(
            "Inserting block at offset {} ({} bytes) before index {}",
            block.offset(),
            block.len(),
            index
        );
        self.blocks.insert(index, block);
    }

    /// Append a block after the current last block
    pub(crate) fn push(&mut self, block: Block) {
        trace!(
            "Appending block at offset {} ({} bytes)",
            block.offset(),
            block.len()
        );
        self.blocks.push(block);
    }

    /// Drop or cut blocks so that none extends past `new_len`
    ///
    /// Scans from the highest offset down and stops at the first block that
    /// ends at or before `new_len`; sort order guarantees every earlier block
    /// does too.
    pub(crate) fn truncate(&mut self, new_len: u64) {
        while let Some(last) = self.blocks.last_mut() {
            if last.offset() > new_len {
                trace!("Removing block at offset {}", last.offset());
                self.blocks.pop();
                continue;
            }

            if last.end() > new_len {
                let keep = (new_len - last.offset()) as usize;
                trace!(
                    "Cutting block at offset {} from {} to {} bytes",
                    last.offset(),
                    last.len(),
                    keep
                );
                last.truncate(keep);
                if last.is_empty() {
                    self.blocks.pop();
                }
            }
            break;
        }
    }

    /// End of the last block, or zero if empty
    pub fn extent(&self) -> u64 {
        self.blocks.last().map_or(0, Block::end)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total bytes actually held in memory
    pub fn stored_bytes(&self) -> u64 {
        self.blocks.iter().map(Block::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn spans(&self) -> Vec<BlockSpan> {
        self.blocks.iter().map(Block::span).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.blocks.clear();
        self.blocks.shrink_to_fit();
    }

    /// Check ordering, non-overlap and the length bound
    pub fn check_invariants(&self, length: u64) -> bool {
        let ordered = self
            .blocks
            .windows(2)
            .all(|pair| pair[0].end() <= pair[1].offset());
        ordered && self.extent() <= length
    }

    pub(crate) fn debug_assert_invariants(&self, length: u64) {
        debug_assert!(
            self.check_invariants(length),
            "block list invariants violated: {:?} (length {})",
            self.spans(),
            length
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(list: &BlockList) -> Vec<(u64, u64)> {
        list.spans().iter().map(|s| (s.offset, s.len)).collect()
    }

    #[test]
    fn test_empty_list() {
        let (list, length) = BlockList::from_blocks(Vec::new(), 0).unwrap();
        assert!(list.is_empty());
        assert_eq!(length, 0);
        assert_eq!(list.locate(0), 0);
    }

    #[test]
    fn test_out_of_order_blocks_are_sorted() {
        let blocks = vec![
            Block::new(64, vec![3; 8]),
            Block::new(0, vec![1; 8]),
            Block::new(32, vec![2; 8]),
        ];
        let (list, length) = BlockList::from_blocks(blocks, 0).unwrap();

        assert_eq!(spans(&list), vec![(0, 8), (32, 8), (64, 8)]);
        assert_eq!(length, 72);
    }

    #[test]
    fn test_adjacent_blocks_are_kept_separate() {
        let blocks = vec![Block::new(0, vec![1; 16]), Block::new(16, vec![2; 16])];
        let (list, length) = BlockList::from_blocks(blocks, 0).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(length, 32);
    }

    #[test]
    fn test_overlap_with_following_block() {
        let blocks = vec![Block::new(12, vec![0; 16]), Block::new(0, vec![0; 16])];
        let result = BlockList::from_blocks(blocks, 0);
        assert!(matches!(
            result,
            Err(StreamError::Overlap {
                existing_index: 0,
                existing_offset: 12,
                offset: 0
            })
        ));
    }

    #[test]
    fn test_overlap_with_preceding_block() {
        let blocks = vec![Block::new(0, vec![0; 16]), Block::new(12, vec![0; 16])];
        let result = BlockList::from_blocks(blocks, 0);
        assert!(matches!(
            result,
            Err(StreamError::Overlap {
                existing_index: 0,
                existing_offset: 0,
                offset: 12
            })
        ));
    }

    #[test]
    fn test_empty_block_at_shared_offset() {
        let blocks = vec![Block::new(8, vec![1; 4]), Block::new(8, Vec::new())];
        let (list, _) = BlockList::from_blocks(blocks, 0).unwrap();
        assert_eq!(spans(&list), vec![(8, 0), (8, 4)]);
        assert!(list.check_invariants(12));
    }

    #[test]
    fn test_explicit_length() {
        let blocks = vec![Block::new(0, vec![0; 16])];
        let (_, length) = BlockList::from_blocks(blocks, 1000).unwrap();
        assert_eq!(length, 1000);
    }

    #[test]
    fn test_explicit_length_too_short() {
        let blocks = vec![Block::new(100, vec![0; 16])];
        let result = BlockList::from_blocks(blocks, 110);
        assert!(matches!(result, Err(StreamError::InvalidArgument(_))));
    }

    #[test]
    fn test_locate_skips_blocks_behind_position() {
        let blocks = vec![Block::new(0, vec![0; 8]), Block::new(16, vec![0; 8])];
        let (list, _) = BlockList::from_blocks(blocks, 0).unwrap();

        assert_eq!(list.locate(0), 0);
        assert_eq!(list.locate(7), 0);
        assert_eq!(list.locate(8), 1);
        assert_eq!(list.locate(23), 1);
        assert_eq!(list.locate(24), 2);
    }

    #[test]
    fn test_truncate_removes_and_cuts() {
        let blocks = vec![
            Block::new(0, vec![1; 8]),
            Block::new(16, vec![2; 8]),
            Block::new(32, vec![3; 8]),
        ];
        let (mut list, _) = BlockList::from_blocks(blocks, 0).unwrap();

        list.truncate(20);
        assert_eq!(spans(&list), vec![(0, 8), (16, 4)]);
        assert!(list.check_invariants(20));
    }

    #[test]
    fn test_truncate_at_block_start_removes_block() {
        let blocks = vec![Block::new(0, vec![1; 8]), Block::new(16, vec![2; 8])];
        let (mut list, _) = BlockList::from_blocks(blocks, 0).unwrap();

        list.truncate(16);
        assert_eq!(spans(&list), vec![(0, 8)]);
    }

    #[test]
    fn test_truncate_beyond_extent_is_noop() {
        let blocks = vec![Block::new(0, vec![1; 8])];
        let (mut list, _) = BlockList::from_blocks(blocks, 0).unwrap();

        list.truncate(100);
        assert_eq!(spans(&list), vec![(0, 8)]);
    }

    #[test]
    fn test_stored_bytes() {
        let blocks = vec![Block::new(0, vec![1; 8]), Block::new(1 << 40, vec![2; 24])];
        let (list, length) = BlockList::from_blocks(blocks, 0).unwrap();
        assert_eq!(list.stored_bytes(), 32);
        assert_eq!(length, (1 << 40) + 24);
    }
}

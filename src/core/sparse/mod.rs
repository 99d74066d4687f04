//! Sparse virtual byte stream
//!
//! `SparseStream` presents a byte space of up to `u64::MAX` bytes while only
//! storing the ranges that were explicitly written. Unwritten ranges ("gaps")
//! read back as zero and are never allocated.
//!
//! # Examples
//!
//! ```
//! use sparse_stream_rs::{Block, SparseStream};
//!
//! # fn main() -> sparse_stream_rs::Result<()> {
//! let blocks = vec![Block::new(0, vec![1; 16]), Block::new(32, vec![2; 16])];
//! let mut stream = SparseStream::from_blocks(blocks, 0)?;
//!
//! let mut buf = vec![0xFF; 48];
//! assert_eq!(stream.read(&mut buf)?, 48);
//! assert!(buf[16..32].iter().all(|&b| b == 0));
//! # Ok(())
//! # }
//! ```

mod read;
mod truncate;
mod write;


use crate::block::{Block, BlockSpan};
use crate::block_list::BlockList;
use crate::contract::{AccessMode, ByteStream, SeekOrigin};
use crate::error::{Result, StreamError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// In-memory stream backed by an ordered list of stored blocks
#[derive(Debug, Clone, Default)]
pub struct SparseStream {
    blocks: BlockList,
    /// Virtual length; may be far larger than the stored bytes
    length: u64,
    position: u64,
    mode: AccessMode,
    disposed: bool,
}

/// Point-in-time summary of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    pub length: u64,
    pub position: u64,
    pub block_count: usize,
    pub stored_bytes: u64,
    pub mode: AccessMode,
}

impl SparseStream {
    /// Create an empty, writable stream of length 0
    pub fn new() -> Self {
        SparseStream::default()
    }

    /// Create a stream from pre-populated blocks
    ///
    /// Blocks may be given in any order. A `length` of zero means "end of the
    /// last block"; a non-zero `length` must cover every block.
    ///
    /// # Errors
    ///
    /// - `Overlap` if two blocks share a byte
    /// - `InvalidArgument` if `length` is too short or a block runs past the
    ///   64-bit address space
    pub fn from_blocks<I>(blocks: I, length: u64) -> Result<Self>
    where
        I: IntoIterator<Item = Block>,
    {
        let (blocks, length) = BlockList::from_blocks(blocks, length)?;
        debug!(
            "Created sparse stream: {} blocks, {} stored bytes, length {}",
            blocks.len(),
            blocks.stored_bytes(),
            length
        );
        Ok(SparseStream {
            blocks,
            length,
            ..SparseStream::default()
        })
    }

    fn ensure_open(&self) -> Result<()> {
        if self.disposed {
            return Err(StreamError::Disposed);
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<()> {
        self.ensure_open()?;
        if !self.mode.is_writable() {
            return Err(StreamError::NotWritable);
        }
        Ok(())
    }

    pub fn len(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.length)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn position(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.position)
    }

    /// Move the cursor
    ///
    /// While writable, moving past the end extends the virtual length to the
    /// new position. Once read-only, the cursor must stay within `[0, len]`.
    pub fn set_position(&mut self, position: u64) -> Result<()> {
        self.ensure_open()?;
        if position > self.length {
            if !self.mode.is_writable() {
                return Err(StreamError::NotWritable);
            }
            self.length = position;
        }
        self.position = position;
        Ok(())
    }

    /// Move the cursor relative to `origin` and return the new position
    ///
    /// `SeekOrigin::End` counts backwards: `offset` must be in `[0, len]` and
    /// the cursor lands on `len - offset`.
    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64> {
        self.ensure_open()?;

        let target = match origin {
            SeekOrigin::Begin => u64::try_from(offset).map_err(|_| before_start(offset))?,
            SeekOrigin::Current => match self.position.checked_add_signed(offset) {
                Some(target) => target,
                None if offset < 0 => return Err(before_start(offset)),
                None => {
                    return Err(StreamError::Overflow(format!(
                        "seeking {} bytes from position {}",
                        offset, self.position
                    )))
                }
            },
            SeekOrigin::End => match u64::try_from(offset) {
                Ok(back) if back <= self.length => self.length - back,
                _ => return Err(before_start(offset)),
            },
        };

        self.set_position(target)?;
        Ok(self.position)
    }

    pub fn mode(&self) -> Result<AccessMode> {
        self.ensure_open()?;
        Ok(self.mode)
    }

    pub fn is_read_only(&self) -> Result<bool> {
        Ok(self.mode()? == AccessMode::ReadOnly)
    }

    /// Switch to read-only mode. There is no way back.
    pub fn make_read_only(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.mode.is_writable() {
            debug!("Sparse stream switched to read-only at length {}", self.length);
            self.mode = AccessMode::ReadOnly;
        }
        Ok(())
    }

    /// Release the stored blocks
    ///
    /// Safe to call more than once. Every later operation fails with
    /// `Disposed`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!(
            "Disposing sparse stream: {} blocks, {} stored bytes",
            self.blocks.len(),
            self.blocks.stored_bytes()
        );
        self.disposed = true;
        self.blocks.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// No-op; everything already lives in memory
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_open()
    }

    pub fn block_count(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.blocks.len())
    }

    /// Bytes actually held in memory, as opposed to the virtual length
    pub fn stored_bytes(&self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.blocks.stored_bytes())
    }

    /// Offsets and sizes of the stored blocks, in order
    pub fn layout(&self) -> Result<Vec<BlockSpan>> {
        self.ensure_open()?;
        Ok(self.blocks.spans())
    }

    /// Block layout as pretty-printed JSON, for test failure messages
    pub fn layout_json(&self) -> Result<String> {
        let layout = self.layout()?;
        Ok(serde_json::to_string_pretty(&layout)?)
    }

    pub fn stats(&self) -> Result<StreamStats> {
        self.ensure_open()?;
        Ok(StreamStats {
            length: self.length,
            position: self.position,
            block_count: self.blocks.len(),
            stored_bytes: self.blocks.stored_bytes(),
            mode: self.mode,
        })
    }

    fn debug_assert_invariants(&self) {
        self.blocks.debug_assert_invariants(self.length);
        debug_assert!(self.mode.is_writable() || self.position <= self.length);
    }
}

fn before_start(offset: i64) -> StreamError {
    StreamError::InvalidArgument(format!(
        "seek offset {} would move before the start of the stream",
        offset
    ))
}

impl ByteStream for SparseStream {
    fn can_read(&self) -> bool {
        !self.disposed
    }

    fn can_seek(&self) -> bool {
        !self.disposed
    }

    fn can_write(&self) -> bool {
        !self.disposed && self.mode.is_writable()
    }

    fn can_timeout(&self) -> bool {
        !self.disposed
    }

    fn len(&self) -> Result<u64> {
        SparseStream::len(self)
    }

    fn position(&self) -> Result<u64> {
        SparseStream::position(self)
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        SparseStream::set_position(self, position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        SparseStream::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        SparseStream::write(self, buf)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64> {
        SparseStream::seek(self, offset, origin)
    }

    fn set_len(&mut self, len: u64) -> Result<()> {
        SparseStream::set_len(self, len)
    }

    fn flush(&mut self) -> Result<()> {
        SparseStream::flush(self)
    }
}

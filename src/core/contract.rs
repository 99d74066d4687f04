//! Capability-based stream contract
//!
//! Every stream in this crate implements [`ByteStream`]. Consumers check the
//! capability flags before calling the matching operation; calling an
//! operation the stream does not support fails instead of panicking.

use crate::error::{Result, StreamError};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Reference point for [`ByteStream::seek`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeekOrigin {
    /// Offset from byte 0
    Begin,
    /// Offset relative to the current position (may be negative)
    Current,
    /// Distance back from the end of the stream
    End,
}

impl TryFrom<i32> for SeekOrigin {
    type Error = StreamError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(SeekOrigin::Begin),
            1 => Ok(SeekOrigin::Current),
            2 => Ok(SeekOrigin::End),
            other => Err(StreamError::InvalidArgument(format!(
                "unknown seek origin: {}",
                other
            ))),
        }
    }
}

/// Whether a stream still accepts mutation
///
/// The only transition is `Writable -> ReadOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    #[default]
    Writable,
    ReadOnly,
}

impl AccessMode {
    pub fn is_writable(self) -> bool {
        self == AccessMode::Writable
    }
}

/// Generic seekable stream
pub trait ByteStream {
    fn can_read(&self) -> bool;

    fn can_seek(&self) -> bool;

    fn can_write(&self) -> bool;

    /// Whether the stream honours timeouts
    fn can_timeout(&self) -> bool {
        false
    }

    /// Virtual length in bytes
    fn len(&self) -> Result<u64>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn position(&self) -> Result<u64>;

    fn set_position(&mut self, position: u64) -> Result<()>;

    /// Read up to `buf.len()` bytes at the cursor and advance it
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all of `buf` at the cursor and advance it
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64>;

    fn set_len(&mut self, len: u64) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Read `count` bytes into `buf[offset..offset + count]`
    fn read_into(&mut self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        let range = checked_range(buf.len(), offset, count)?;
        self.read(&mut buf[range])
    }

    /// Write `buf[offset..offset + count]`
    fn write_from(&mut self, buf: &[u8], offset: usize, count: usize) -> Result<()> {
        let range = checked_range(buf.len(), offset, count)?;
        self.write(&buf[range])
    }
}

/// Validate an `(offset, count)` window against a buffer of `buf_len` bytes
pub fn checked_range(buf_len: usize, offset: usize, count: usize) -> Result<Range<usize>> {
    match offset.checked_add(count) {
        Some(end) if end <= buf_len => Ok(offset..end),
        _ => Err(StreamError::InvalidArgument(format!(
            "range {}+{} is outside a buffer of {} bytes",
            offset, count, buf_len
        ))),
    }
}

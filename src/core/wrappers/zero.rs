//! Stream of zeros with default capabilities

use crate::contract::{ByteStream, SeekOrigin};
use crate::error::{Result, StreamError};

/// Read-only stream of `len` zero bytes
///
/// Seeks stay within `[0, len]`; every mutating call fails with
/// `NotWritable`.
#[derive(Debug, Clone, Default)]
pub struct ZeroStream {
    len: u64,
    position: u64,
}

impl ZeroStream {
    pub fn new(len: u64) -> Self {
        ZeroStream { len, position: 0 }
    }
}

impl ByteStream for ZeroStream {
    fn can_read(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        false
    }

    fn len(&self) -> Result<u64> {
        Ok(self.len)
    }

    fn position(&self) -> Result<u64> {
        Ok(self.position)
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        if position > self.len {
            return Err(StreamError::NotWritable);
        }
        self.position = position;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = (buf.len() as u64).min(self.len - self.position) as usize;
        buf[..count].fill(0);
        self.position += count as u64;
        Ok(count)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<()> {
        Err(StreamError::NotWritable)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64> {
        let base = match origin {
            SeekOrigin::Begin => 0,
            SeekOrigin::Current => self.position,
            SeekOrigin::End => {
                return match u64::try_from(offset) {
                    Ok(back) if back <= self.len => {
                        self.position = self.len - back;
                        Ok(self.position)
                    }
                    _ => Err(StreamError::InvalidArgument(format!(
                        "seek offset {} from end is outside the stream",
                        offset
                    ))),
                };
            }
        };
        let target = base.checked_add_signed(offset).ok_or_else(|| {
            StreamError::InvalidArgument(format!("seek offset {} is outside the stream", offset))
        })?;
        self.set_position(target)?;
        Ok(target)
    }

    fn set_len(&mut self, _len: u64) -> Result<()> {
        Err(StreamError::NotWritable)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

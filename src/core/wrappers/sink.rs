//! Write-only sink

use crate::contract::{ByteStream, SeekOrigin};
use crate::error::{Result, StreamError};

/// Discards everything written to it, counting the bytes
#[derive(Debug, Clone, Default)]
pub struct NullSink {
    written: u64,
}

impl NullSink {
    pub fn new() -> Self {
        NullSink::default()
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }
}

impl ByteStream for NullSink {
    fn can_read(&self) -> bool {
        false
    }

    fn can_seek(&self) -> bool {
        false
    }

    fn can_write(&self) -> bool {
        true
    }

    fn len(&self) -> Result<u64> {
        Ok(self.written)
    }

    fn position(&self) -> Result<u64> {
        Ok(self.written)
    }

    fn set_position(&mut self, _position: u64) -> Result<()> {
        Err(StreamError::NotSupported("set_position on a write-only sink".to_string()))
    }

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(StreamError::NotReadable)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.written = self.written.saturating_add(buf.len() as u64);
        Ok(())
    }

    fn seek(&mut self, _offset: i64, _origin: SeekOrigin) -> Result<u64> {
        Err(StreamError::NotSupported("seek on a write-only sink".to_string()))
    }

    fn set_len(&mut self, _len: u64) -> Result<()> {
        Err(StreamError::NotSupported("set_len on a write-only sink".to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

//! Read-size limiting wrapper
//!
//! Decoders often assume a single `read` fills the whole buffer. Wrapping
//! their input in `ReadLimited` forces short reads and shakes out that bug.

use crate::contract::{ByteStream, SeekOrigin};
use crate::error::{Result, StreamError};

/// Caps every `read` at `max_read` bytes; everything else passes through
#[derive(Debug)]
pub struct ReadLimited<S> {
    inner: S,
    max_read: usize,
}

impl<S: ByteStream> ReadLimited<S> {
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `max_read` is zero, since a stream that
    /// can never return data is indistinguishable from end-of-stream.
    pub fn new(inner: S, max_read: usize) -> Result<Self> {
        if max_read == 0 {
            return Err(StreamError::InvalidArgument(
                "max_read must be at least 1".to_string(),
            ));
        }
        Ok(ReadLimited { inner, max_read })
    }

    pub fn max_read(&self) -> usize {
        self.max_read
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteStream> ByteStream for ReadLimited<S> {
    fn can_read(&self) -> bool {
        self.inner.can_read()
    }

    fn can_seek(&self) -> bool {
        self.inner.can_seek()
    }

    fn can_write(&self) -> bool {
        self.inner.can_write()
    }

    fn can_timeout(&self) -> bool {
        self.inner.can_timeout()
    }

    fn len(&self) -> Result<u64> {
        self.inner.len()
    }

    fn position(&self) -> Result<u64> {
        self.inner.position()
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        self.inner.set_position(position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let limit = buf.len().min(self.max_read);
        self.inner.read(&mut buf[..limit])
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write(buf)
    }

    fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64> {
        self.inner.seek(offset, origin)
    }

    fn set_len(&mut self, len: u64) -> Result<()> {
        self.inner.set_len(len)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

//! Async entry points (feature `async`)
//!
//! Nothing here actually suspends: every call runs the synchronous algorithm
//! and completes on first poll. The one async behaviour kept is early
//! cancellation, which is checked before any state is touched.

use crate::error::{Result, StreamError};
use crate::sparse::SparseStream;
use std::io::{self, Seek, SeekFrom};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite, ReadBuf};

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    requested: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Cancellation::default()
    }

    pub fn cancel(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(StreamError::Cancelled);
        }
        Ok(())
    }
}

impl SparseStream {
    pub async fn read_async(&mut self, buf: &mut [u8], cancel: &Cancellation) -> Result<usize> {
        cancel.check()?;
        self.read(buf)
    }

    pub async fn write_async(&mut self, buf: &[u8], cancel: &Cancellation) -> Result<()> {
        cancel.check()?;
        self.write(buf)
    }

    pub async fn write_at_async(
        &mut self,
        position: u64,
        buf: &[u8],
        cancel: &Cancellation,
    ) -> Result<u64> {
        cancel.check()?;
        self.write_at(position, buf)
    }

    pub async fn set_len_async(&mut self, len: u64, cancel: &Cancellation) -> Result<()> {
        cancel.check()?;
        self.set_len(len)
    }

    pub async fn flush_async(&mut self, cancel: &Cancellation) -> Result<()> {
        cancel.check()?;
        self.flush()
    }
}

impl AsyncRead for SparseStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let result = SparseStream::read(this, buf.initialize_unfilled()).map(|n| buf.advance(n));
        Poll::Ready(result.map_err(io::Error::from))
    }
}

impl AsyncWrite for SparseStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let result = SparseStream::write(this, buf).map(|()| buf.len());
        Poll::Ready(result.map_err(io::Error::from))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(SparseStream::flush(self.get_mut()).map_err(io::Error::from))
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.poll_flush(cx)
    }
}

impl AsyncSeek for SparseStream {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        Seek::seek(self.get_mut(), position).map(|_| ())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(self.get_mut().position().map_err(io::Error::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_cancelled_before_work() {
        let mut stream = SparseStream::new();
        let cancel = Cancellation::new();
        cancel.cancel();

        let result = stream.write_async(b"data", &cancel).await;
        assert!(matches!(result, Err(StreamError::Cancelled)));
        assert_eq!(stream.len().unwrap(), 0);
        assert_eq!(stream.block_count().unwrap(), 0);

        let result = stream.set_len_async(10, &cancel).await;
        assert!(matches!(result, Err(StreamError::Cancelled)));
        assert_eq!(stream.len().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let mut stream = SparseStream::new();
        let cancel = Cancellation::new();

        stream.write_at_async(100, b"abc", &cancel).await.unwrap();
        stream.set_position(98).unwrap();

        let mut buf = [0xFFu8; 5];
        assert_eq!(stream.read_async(&mut buf, &cancel).await.unwrap(), 5);
        assert_eq!(&buf, &[0, 0, b'a', b'b', b'c']);
        stream.flush_async(&cancel).await.unwrap();
    }

    #[tokio::test]
    async fn test_tokio_io_traits() {
        let blocks = vec![Block::new(4, b"tail".to_vec())];
        let mut stream = SparseStream::from_blocks(blocks, 0).unwrap();

        let mut out = Vec::new();
        AsyncReadExt::read_to_end(&mut stream, &mut out).await.unwrap();
        assert_eq!(out, b"\0\0\0\0tail");

        AsyncSeekExt::seek(&mut stream, SeekFrom::Start(0)).await.unwrap();
        AsyncWriteExt::write_all(&mut stream, b"head").await.unwrap();
        AsyncWriteExt::flush(&mut stream).await.unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(stream.read_at(0, &mut buf).unwrap(), 8);
        assert_eq!(&buf, b"headtail");
    }
}

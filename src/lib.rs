//! # sparse-stream-rs - Sparse In-Memory Byte Streams
//!
//! `sparse-stream-rs` provides a seekable, writable byte stream that can be
//! far larger than the memory backing it. Only explicitly written ranges
//! ("blocks") are stored; everything else reads back as zero.
//!
//! Typical uses in tests:
//!
//! - **Huge virtual files**: exercise 64-bit offset handling without
//!   allocating terabytes
//! - **Short reads**: wrap any stream in [`ReadLimited`] to fuzz decoders
//! - **Read-only inputs**: freeze a fixture with [`SparseStream::make_read_only`]
//!
//! ## Quick Start
//!
//! ```rust
//! use sparse_stream_rs::{Block, SeekOrigin, SparseStream, Result};
//!
//! # fn main() -> Result<()> {
//! // 16 bytes stored at 1 TiB inside a 2 TiB stream
//! let mut stream = SparseStream::from_blocks(vec![Block::new(1 << 40, vec![7; 16])], 2 << 40)?;
//!
//! stream.seek(1 << 40, SeekOrigin::Begin)?;
//! let mut buf = [0u8; 32];
//! assert_eq!(stream.read(&mut buf)?, 32);
//! assert_eq!(&buf[..16], &[7; 16]);
//! assert_eq!(&buf[16..], &[0; 16]);
//!
//! assert_eq!(stream.stored_bytes()?, 16);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use sparse_stream_rs::{Block, StreamOptions};
//!
//! # fn main() -> sparse_stream_rs::Result<()> {
//! let options = StreamOptions::from_toml_str("length = 4096\nread_only = true")?;
//! let stream = options.build(vec![Block::new(0, b"header".to_vec())])?;
//! assert!(stream.is_read_only()?);
//! # Ok(())
//! # }
//! ```

// Engine and collaborators
pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{block, block_list, contract, error, options, sparse, wrappers};

pub use crate::core::{
    block::{Block, BlockSpan},
    block_list::BlockList,
    contract::{checked_range, AccessMode, ByteStream, SeekOrigin},
    error::{Result, StreamError},
    options::StreamOptions,
    sparse::{SparseStream, StreamStats},
    wrappers::{NullSink, ReadLimited, ZeroStream},
};

#[cfg(feature = "async")]
pub use crate::core::async_io::Cancellation;

use tracing::debug;

/// Chunk size used when draining a stream into memory
const COPY_CHUNK: usize = 64 * 1024;

/// Read everything from the current position to the end of `stream`
///
/// Keeps reading until the stream reports 0 bytes, so it also works through
/// a [`ReadLimited`] wrapper.
///
/// # Errors
///
/// Returns `NotReadable` if the stream cannot be read, or `InvalidArgument`
/// if a buffer for the remaining length cannot be allocated.
pub fn read_to_vec<S: ByteStream + ?Sized>(stream: &mut S) -> Result<Vec<u8>> {
    if !stream.can_read() {
        return Err(StreamError::NotReadable);
    }

    let remaining = stream.len()?.saturating_sub(stream.position()?);
    let too_large = || {
        StreamError::InvalidArgument(format!(
            "{} remaining bytes do not fit in memory",
            remaining
        ))
    };
    let capacity = usize::try_from(remaining).map_err(|_| too_large())?;

    let mut out = Vec::new();
    out.try_reserve_exact(capacity).map_err(|_| too_large())?;
    debug!("Draining {} bytes into memory", capacity);

    let mut chunk = vec![0u8; COPY_CHUNK.min(capacity.max(1))];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(out)
}

/// Read the whole stream from byte 0, leaving the cursor where it was
pub fn copy_to_vec<S: ByteStream + ?Sized>(stream: &mut S) -> Result<Vec<u8>> {
    if !stream.can_seek() {
        return Err(StreamError::NotSupported(
            "copy_to_vec needs a seekable stream".to_string(),
        ));
    }

    let saved = stream.position()?;
    stream.seek(0, SeekOrigin::Begin)?;
    let result = read_to_vec(stream);
    stream.set_position(saved)?;
    result
}

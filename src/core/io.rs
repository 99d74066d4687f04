//! `std::io` adapters for [`SparseStream`]
//!
//! Lets a sparse stream stand in for a file anywhere a `Read + Write + Seek`
//! is expected.

use crate::contract::SeekOrigin;
use crate::error::StreamError;
use crate::sparse::SparseStream;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        let kind = match &err {
            StreamError::InvalidArgument(_) | StreamError::Overlap { .. } => {
                ErrorKind::InvalidInput
            }
            StreamError::NotWritable | StreamError::NotReadable => ErrorKind::PermissionDenied,
            StreamError::NotSupported(_) => ErrorKind::Unsupported,
            StreamError::Disposed => ErrorKind::NotConnected,
            StreamError::Overflow(_) => ErrorKind::InvalidInput,
            StreamError::Cancelled => ErrorKind::Interrupted,
            StreamError::Config(_) | StreamError::Serialization(_) => ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

impl Read for SparseStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(SparseStream::read(self, buf)?)
    }
}

impl Write for SparseStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SparseStream::write(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(SparseStream::flush(self)?)
    }
}

impl Seek for SparseStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let position = match pos {
            SeekFrom::Start(offset) => {
                SparseStream::set_position(self, offset)?;
                offset
            }
            SeekFrom::Current(offset) => SparseStream::seek(self, offset, SeekOrigin::Current)?,
            // `SeekOrigin::End` counts backwards from the end.
            SeekFrom::End(offset) if offset <= 0 => {
                let back = offset.checked_neg().ok_or_else(|| {
                    StreamError::Overflow(format!("seek offset {} from end", offset))
                })?;
                SparseStream::seek(self, back, SeekOrigin::End)?
            }
            SeekFrom::End(offset) => {
                let target = self.len()?.checked_add(offset as u64).ok_or_else(|| {
                    StreamError::Overflow(format!("seek offset {} from end", offset))
                })?;
                SparseStream::set_position(self, target)?;
                target
            }
        };
        Ok(position)
    }
}

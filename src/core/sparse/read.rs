use super::SparseStream;
use crate::error::Result;
use tracing::trace;

impl SparseStream {
    /// Read at the cursor and advance it by the number of bytes read
    ///
    /// Returns fewer than `buf.len()` bytes only when the read reaches the
    /// end of the stream, and 0 at or past the end.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        let read = self.fill(self.position, buf);
        self.position += read as u64;
        Ok(read)
    }

    /// Read at `position` without moving the cursor
    pub fn read_at(&self, position: u64, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.fill(position, buf))
    }

    /// Copy stored bytes and zero-fill gaps for `[start, start + n)`
    ///
    /// `n` is `buf.len()` clipped at the virtual length.
    fn fill(&self, start: u64, buf: &mut [u8]) -> usize {
        if start >= self.length {
            return 0;
        }
        let want = (buf.len() as u64).min(self.length - start) as usize;
        let buf = &mut buf[..want];

        let mut pos = start;
        let mut filled = 0;
        let mut index = self.blocks.locate(pos);

        while filled < want {
            let remaining = want - filled;

            let Some(block) = self.blocks.get(index) else {
                // Past the last block: zeros up to the requested end, which
                // is already clipped at the virtual length.
                buf[filled..].fill(0);
                filled = want;
                break;
            };

            if block.end() <= pos {
                index += 1;
                continue;
            }

            if pos < block.offset() {
                let gap = (block.offset() - pos).min(remaining as u64) as usize;
                buf[filled..filled + gap].fill(0);
                pos += gap as u64;
                filled += gap;
                continue;
            }

            let inner = (pos - block.offset()) as usize;
            let count = ((block.end() - pos) as usize).min(remaining);
            buf[filled..filled + count].copy_from_slice(&block.data()[inner..inner + count]);
            pos += count as u64;
            filled += count;
            index += 1;
        }

        trace!("Read {} bytes at offset {}", filled, start);
        filled
    }
}

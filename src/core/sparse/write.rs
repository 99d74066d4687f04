use super::SparseStream;
use crate::block::Block;
use crate::error::{Result, StreamError};
use tracing::trace;

impl SparseStream {
    /// Write all of `buf` at the cursor
    ///
    /// Advances the cursor past the written bytes and grows the virtual
    /// length if the write ends beyond it.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        let end = self.write_at(self.position, buf)?;
        self.position = end;
        Ok(())
    }

    /// Write all of `buf` at `position` without moving the cursor
    ///
    /// Returns the position just past the written bytes. Bytes landing in
    /// existing blocks overwrite them in place; bytes landing in gaps become
    /// new blocks. Contiguous writes are not merged.
    pub fn write_at(&mut self, position: u64, buf: &[u8]) -> Result<u64> {
        self.ensure_writable()?;
        let end = position.checked_add(buf.len() as u64).ok_or_else(|| {
            StreamError::Overflow(format!(
                "writing {} bytes at offset {}",
                buf.len(),
                position
            ))
        })?;

        if !buf.is_empty() {
            self.merge(position, buf);
            self.length = self.length.max(end);
        }

        self.debug_assert_invariants();
        Ok(end)
    }

    fn merge(&mut self, start: u64, src: &[u8]) {
        let mut pos = start;
        let mut written = 0;
        let mut index = self.blocks.locate(pos);

        while written < src.len() {
            let remaining = &src[written..];

            let Some(block) = self.blocks.get_mut(index) else {
                self.blocks.push(Block::new(pos, remaining.to_vec()));
                return;
            };
            let (offset, end) = (block.offset(), block.end());

            if end <= pos {
                index += 1;
                continue;
            }

            if pos >= offset {
                let inner = (pos - offset) as usize;
                let count = ((end - pos) as usize).min(remaining.len());
                block.data_mut()[inner..inner + count].copy_from_slice(&remaining[..count]);
                trace!("Overwrote {} bytes in block at offset {}", count, offset);
                pos += count as u64;
                written += count;
                index += 1;
                continue;
            }

            let gap = offset - pos;
            if remaining.len() as u64 <= gap {
                self.blocks.insert_at(index, Block::new(pos, remaining.to_vec()));
                return;
            }

            // Fill the gap, then continue into the next block.
            let gap = gap as usize;
            self.blocks
                .insert_at(index, Block::new(pos, remaining[..gap].to_vec()));
            index += 1;
            pos += gap as u64;
            written += gap;
        }
    }
}

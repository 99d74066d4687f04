use super::SparseStream;
use crate::error::Result;
use tracing::debug;

impl SparseStream {
    /// Set the virtual length
    ///
    /// Shrinking drops every stored byte at or past `len` and pulls the
    /// cursor back to `len` if it was further out. Growing only widens the
    /// zero-filled tail.
    pub fn set_len(&mut self, len: u64) -> Result<()> {
        self.ensure_writable()?;
        debug!("Setting sparse stream length {} -> {}", self.length, len);

        self.length = len;
        if self.position > len {
            self.position = len;
        }
        self.blocks.truncate(len);

        self.debug_assert_invariants();
        Ok(())
    }
}

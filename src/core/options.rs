//! Stream configuration
//!
//! Test fixtures often describe their streams in TOML next to the data:
//!
//! ```toml
//! length = 1048576
//! read_only = true
//! max_read = 7
//! ```

use crate::block::Block;
use crate::error::{Result, StreamError};
use crate::sparse::SparseStream;
use crate::wrappers::ReadLimited;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings for building a [`SparseStream`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamOptions {
    /// Virtual length; zero means "end of the last block"
    pub length: u64,

    /// Switch the stream to read-only right after construction
    pub read_only: bool,

    /// Cap on bytes returned by a single read, for [`StreamOptions::build_limited`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_read: Option<usize>,
}

impl StreamOptions {
    pub fn new() -> Self {
        StreamOptions::default()
    }

    pub fn length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn max_read(mut self, max_read: usize) -> Self {
        self.max_read = Some(max_read);
        self
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| StreamError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| StreamError::Config(e.to_string()))
    }

    /// Build a stream over `blocks` with these options
    pub fn build<I>(&self, blocks: I) -> Result<SparseStream>
    where
        I: IntoIterator<Item = Block>,
    {
        debug!("Building sparse stream from {:?}", self);
        let mut stream = SparseStream::from_blocks(blocks, self.length)?;
        if self.read_only {
            stream.make_read_only()?;
        }
        Ok(stream)
    }

    /// Build a stream and wrap it in a [`ReadLimited`]
    ///
    /// # Errors
    ///
    /// Returns `Config` if `max_read` is not set.
    pub fn build_limited<I>(&self, blocks: I) -> Result<ReadLimited<SparseStream>>
    where
        I: IntoIterator<Item = Block>,
    {
        let max_read = self
            .max_read
            .ok_or_else(|| StreamError::Config("max_read must be set".to_string()))?;
        ReadLimited::new(self.build(blocks)?, max_read)
    }
}

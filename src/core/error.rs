use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "Block at offset {offset} overlaps block {existing_index} at offset {existing_offset}"
    )]
    Overlap {
        existing_index: usize,
        existing_offset: u64,
        offset: u64,
    },

    #[error("Stream is read-only")]
    NotWritable,

    #[error("Stream does not support reading")]
    NotReadable,

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Stream has been disposed")]
    Disposed,

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;

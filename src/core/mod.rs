//! Sparse stream engine and its collaborators

pub mod block;
pub mod block_list;
pub mod contract;
pub mod error;
pub mod io;
pub mod options;
pub mod sparse;
pub mod wrappers;

#[cfg(feature = "async")]
pub mod async_io;

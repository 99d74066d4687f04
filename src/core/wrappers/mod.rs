//! Auxiliary streams for exercising stream consumers
//!
//! These implement the same [`ByteStream`](crate::contract::ByteStream)
//! contract as the sparse stream and are meant to be mixed with it in tests.

pub mod limited;
pub mod sink;
pub mod zero;

pub use limited::ReadLimited;
pub use sink::NullSink;
pub use zero::ZeroStream;

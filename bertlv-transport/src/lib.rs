//! Byte source abstraction for streaming TLV decode
//!
//! This crate provides the `ByteSource` capability consumed by the codec
//! layer, with memory-backed and TCP-backed implementations.

pub mod stream;
pub mod memory;
pub mod tcp;

pub use bertlv_core::{TlvError, TlvResult};
pub use stream::ByteSource;
pub use memory::MemorySource;
pub use tcp::{TcpSource, TcpSettings};

//! Core types and utilities for streaming BER/DER TLV processing
//!
//! This crate provides the error taxonomy and the growable record buffer
//! shared by the transport and codec layers.

pub mod error;
pub mod buffer;

pub use error::{TlvError, TlvResult};
pub use buffer::RecordBuffer;

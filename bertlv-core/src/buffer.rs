//! Growable byte buffer for assembling one record
//!
//! The buffer is append-only: bytes are copied onto the end as they arrive
//! from the transport, and the finished contents are handed to the caller
//! in one ownership transfer. There is no shrink and no random-access
//! mutation, matching the sequential nature of streaming decode.

use crate::error::TlvResult;

/// Append-only byte buffer backing one in-flight record
///
/// # Growth Strategy
///
/// Backing storage grows by at least the current capacity or the requested
/// increment, whichever is larger, so repeated small appends cost amortized
/// linear copying. Growth goes through `Vec::try_reserve`, so allocation
/// exhaustion surfaces as `TlvError::Allocation` instead of aborting.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    data: Vec<u8>,
}

impl RecordBuffer {
    /// Create a new, empty buffer
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Append bytes onto the end of the buffer
    ///
    /// # Arguments
    /// * `bytes` - Bytes to copy onto the end
    ///
    /// # Error Handling
    /// Returns `TlvError::Allocation` if the backing storage cannot grow.
    pub fn append(&mut self, bytes: &[u8]) -> TlvResult<()> {
        let spare = self.data.capacity() - self.data.len();
        if spare < bytes.len() {
            // Double-or-increment, whichever is larger
            let additional = bytes.len().max(self.data.capacity());
            self.data.try_reserve(additional)?;
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Number of valid bytes written so far
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current capacity of the backing storage
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// View the written prefix
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Transfer ownership of the contents, leaving the buffer empty
    ///
    /// Called exactly once per successful read; only the written prefix is
    /// ever returned.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

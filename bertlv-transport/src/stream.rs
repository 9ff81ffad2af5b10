//! Byte source trait for the transport layer

use async_trait::async_trait;
use bertlv_core::TlvResult;
use std::time::Duration;

/// Byte source interface consumed by the streaming reader
///
/// A source delivers raw bytes in caller-bounded increments. Blocking
/// behavior, timeouts, and cancellation all live behind this seam; the
/// reader only ever issues bounded `read` calls.
#[async_trait]
pub trait ByteSource: Send {
    /// Set the read timeout
    ///
    /// # Arguments
    ///
    /// * `timeout` - The timeout duration. None means infinite timeout.
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> TlvResult<()>;

    /// Read data from the source
    ///
    /// # Arguments
    ///
    /// * `buf` - Buffer to read into
    ///
    /// # Returns
    ///
    /// Number of bytes read, between 0 and `buf.len()`. A return of 0
    /// signals end-of-source; whether that is an error is the caller's
    /// call, not the source's.
    async fn read(&mut self, buf: &mut [u8]) -> TlvResult<usize>;

    /// Check if the source is closed
    fn is_closed(&self) -> bool;

    /// Close the source
    async fn close(&mut self) -> TlvResult<()>;
}

//! Memory-backed byte source
//!
//! Wraps an owned byte vector behind the `ByteSource` capability so the
//! codec layer can be exercised without a live connection. Reading past
//! the end of the vector reports end-of-source.

use crate::stream::ByteSource;
use async_trait::async_trait;
use bertlv_core::TlvResult;
use std::time::Duration;

/// Byte source backed by an in-memory buffer
#[derive(Debug)]
pub struct MemorySource {
    data: Vec<u8>,
    position: usize,
    closed: bool,
}

impl MemorySource {
    /// Create a new memory source over the given bytes
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
            closed: false,
        }
    }

    /// Number of bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn set_timeout(&mut self, _timeout: Option<Duration>) -> TlvResult<()> {
        // Memory reads never block
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> TlvResult<usize> {
        if self.closed {
            return Ok(0);
        }
        let available = self.data.len() - self.position;
        let count = buf.len().min(available);
        buf[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> TlvResult<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_in_increments() {
        let mut source = MemorySource::new(vec![1u8, 2, 3, 4, 5]);
        let mut buf = [0u8; 2];

        assert_eq!(source.read(&mut buf).await.unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(source.read(&mut buf).await.unwrap(), 2);
        assert_eq!(buf, [3, 4]);
        assert_eq!(source.read(&mut buf).await.unwrap(), 1);
        assert_eq!(buf[0], 5);
        assert_eq!(source.remaining(), 0);

        // Exhausted source reports end-of-source, not an error
        assert_eq!(source.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_source_reads_nothing() {
        let mut source = MemorySource::new(vec![1u8, 2, 3]);
        source.close().await.unwrap();
        assert!(source.is_closed());

        let mut buf = [0u8; 3];
        assert_eq!(source.read(&mut buf).await.unwrap(), 0);
    }
}

//! TCP byte source implementation

use crate::stream::ByteSource;
use async_trait::async_trait;
use bertlv_core::{TlvError, TlvResult};
use std::fmt;
use std::net::SocketAddr;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Wrapper for TcpStream that implements Debug
struct DebugTcpStream(TcpStream);

impl fmt::Debug for DebugTcpStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpStream").finish()
    }
}

impl Deref for DebugTcpStream {
    type Target = TcpStream;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DebugTcpStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// TCP byte source settings
#[derive(Debug, Clone)]
pub struct TcpSettings {
    pub address: SocketAddr,
    pub timeout: Option<Duration>,
}

impl TcpSettings {
    /// Create new TCP settings
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            timeout: Some(Duration::from_secs(30)),
        }
    }

    /// Create TCP settings with timeout
    pub fn with_timeout(address: SocketAddr, timeout: Duration) -> Self {
        Self {
            address,
            timeout: Some(timeout),
        }
    }
}

/// TCP byte source implementation
#[derive(Debug)]
pub struct TcpSource {
    stream: Option<DebugTcpStream>,
    settings: TcpSettings,
    closed: bool,
}

impl TcpSource {
    /// Create a new, unconnected TCP source
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            stream: None,
            settings,
            closed: true,
        }
    }

    /// Create a TCP source from an address string
    pub fn from_address(address: &str) -> TlvResult<Self> {
        let addr: SocketAddr = address.parse().map_err(|e| {
            TlvError::InvalidEncoding(format!("Invalid TCP address: {}", e))
        })?;
        Ok(Self::new(TcpSettings::new(addr)))
    }

    /// Create a TCP source from an already-connected TcpStream (for accept-side use)
    ///
    /// # Arguments
    /// * `stream` - The already-connected TCP stream
    /// * `timeout` - Optional read timeout
    pub fn from_connected_stream(stream: TcpStream, timeout: Option<Duration>) -> Self {
        Self {
            stream: Some(DebugTcpStream(stream)),
            settings: TcpSettings {
                address: SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 0),
                timeout,
            },
            closed: false,
        }
    }

    /// Open the connection
    ///
    /// # Error Handling
    /// Returns error if already open, on connect failure, or on connect
    /// timeout when one is configured.
    pub async fn open(&mut self) -> TlvResult<()> {
        if !self.closed {
            return Err(TlvError::Connection(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let stream = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, TcpStream::connect(self.settings.address))
                .await
                .map_err(|_| TlvError::Timeout)?
                .map_err(TlvError::Connection)?
        } else {
            TcpStream::connect(self.settings.address)
                .await
                .map_err(TlvError::Connection)?
        };

        log::debug!("TCP source connected to {}", self.settings.address);
        self.stream = Some(DebugTcpStream(stream));
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl ByteSource for TcpSource {
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> TlvResult<()> {
        self.settings.timeout = timeout;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> TlvResult<usize> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            TlvError::Connection(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "TCP stream not connected",
            ))
        })?;

        let result = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, stream.read(buf)).await
                .map_err(|_| TlvError::Timeout)?
                .map_err(TlvError::Connection)
        } else {
            stream.read(buf).await.map_err(TlvError::Connection)
        };

        match result {
            Ok(0) => {
                self.closed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) => {
                self.closed = true;
                Err(e)
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> TlvResult<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tcp_settings() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let settings = TcpSettings::new(addr);
        assert_eq!(settings.address, addr);
        assert!(settings.timeout.is_some());
    }

    #[tokio::test]
    async fn test_tcp_read_roundtrip() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut peer, _) = listener.accept().await.unwrap();
            peer.write_all(b"test").await.unwrap();
        });

        let mut source = TcpSource::new(TcpSettings::new(addr));
        source.open().await.unwrap();
        assert!(!source.is_closed());

        let mut buf = [0u8; 4];
        let mut read = 0;
        while read < buf.len() {
            let n = source.read(&mut buf[read..]).await.unwrap();
            assert!(n > 0);
            read += n;
        }
        assert_eq!(&buf, b"test");

        server.await.unwrap();
        source.close().await.unwrap();
        assert!(source.is_closed());
    }
}

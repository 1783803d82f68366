// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP gateway transport.
//!
//! Forward frames are written to the socket as two raw bytes. Whatever the
//! gateway writes back within the receive timeout is returned as the
//! backward frame.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::Transport;
use crate::config::TcpConfig;
use crate::error::TransportError;
use crate::frame::Frame;

/// Largest backward frame read in one go.
const RECV_BUFFER_SIZE: usize = 1024;

/// A DALI gateway reached over TCP.
///
/// The connection is opened by [`Transport::connect`] and not re-opened
/// automatically after an error. When the gateway closes the connection,
/// the socket is released and [`Transport::is_connected`] turns false.
///
/// # Examples
///
/// ```no_run
/// use dali_host::config::TcpConfig;
/// use dali_host::transport::{TcpTransport, Transport};
///
/// # async fn example() -> Result<(), dali_host::error::TransportError> {
/// let mut transport = TcpTransport::new(TcpConfig::new("192.168.1.40"));
/// transport.connect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TcpTransport {
    config: TcpConfig,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Creates a disconnected transport.
    #[must_use]
    pub fn new(config: TcpConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    /// Returns the configured `host:port`.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }
}

impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let addr = self.addr();
        let timeout = self.config.timeout();
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(
            addr = %addr,
            timeout_ms,
            "Connecting to DALI gateway"
        );

        let connect = TcpStream::connect((self.config.host.as_str(), self.config.port));
        let stream = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| {
                tracing::error!(addr = %addr, "Gateway connection timed out");
                TransportError::ConnectTimeout(timeout_ms)
            })?
            .map_err(|e| {
                tracing::error!(addr = %addr, error = %e, "Gateway connection failed");
                TransportError::ConnectionFailed(format!("{addr}: {e}"))
            })?;

        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(addr = %addr, error = %e, "Failed to set TCP_NODELAY");
        }

        tracing::info!(addr = %addr, "Connected to DALI gateway");
        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!(addr = %self.addr(), error = %e, "Socket shutdown failed");
            }
            tracing::info!(addr = %self.addr(), "Disconnected from DALI gateway");
        }
        Ok(())
    }

    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        let timeout = self.config.timeout();
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        let write = async {
            stream.write_all(frame.as_bytes()).await?;
            stream.flush().await
        };
        match tokio::time::timeout(timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!(frame = %frame, error = %e, "Failed to send frame");
                Err(e.into())
            }
            Err(_) => {
                tracing::error!(frame = %frame, "Sending frame timed out");
                Err(std::io::Error::from(std::io::ErrorKind::TimedOut).into())
            }
        }
    }

    async fn recv(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        let mut buf = [0u8; RECV_BUFFER_SIZE];
        match tokio::time::timeout(timeout, stream.read(&mut buf)).await {
            Err(_) => {
                tracing::trace!(timeout_ms = timeout.as_millis(), "No backward frame");
                Ok(None)
            }
            Ok(Ok(0)) => {
                tracing::info!(addr = %self.addr(), "Gateway closed the connection");
                self.stream = None;
                Ok(None)
            }
            Ok(Ok(n)) => {
                tracing::trace!(bytes = n, data = ?&buf[..n], "Received backward frame");
                Ok(Some(buf[..n].to_vec()))
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Failed to read from gateway");
                Err(e.into())
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, TcpConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = TcpConfig::new("127.0.0.1")
            .with_port(port)
            .with_timeout(Duration::from_millis(500));
        (listener, config)
    }

    #[tokio::test]
    async fn send_requires_connection() {
        let mut transport = TcpTransport::new(TcpConfig::default());
        assert!(matches!(
            transport.send(Frame::new(0xFF, 0x00)).await,
            Err(TransportError::NotConnected)
        ));
        assert_eq!(transport.recv(Duration::from_millis(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let (listener, config) = listener().await;
        let mut transport = TcpTransport::new(config);
        transport.connect().await.unwrap();
        let _peer = listener.accept().await.unwrap();
        transport.connect().await.unwrap();
        assert!(transport.is_connected());
        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn writes_raw_frame_bytes() {
        let (listener, config) = listener().await;
        let mut transport = TcpTransport::new(config);
        transport.connect().await.unwrap();
        let (mut peer, _) = listener.accept().await.unwrap();

        transport.send(Frame::new(0x01, 0x90)).await.unwrap();
        let mut buf = [0u8; 2];
        peer.read_exact(&mut buf).await.unwrap();
        assert_eq!(buf, [0x01, 0x90]);
    }

    #[tokio::test]
    async fn recv_times_out_with_none() {
        let (listener, config) = listener().await;
        let mut transport = TcpTransport::new(config);
        transport.connect().await.unwrap();
        let _peer = listener.accept().await.unwrap();
        assert_eq!(transport.recv(Duration::from_millis(20)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn peer_close_releases_stream() {
        let (listener, config) = listener().await;
        let mut transport = TcpTransport::new(config);
        transport.connect().await.unwrap();
        let (peer, _) = listener.accept().await.unwrap();
        drop(peer);
        assert_eq!(transport.recv(Duration::from_millis(500)).await.unwrap(), None);
        assert!(!transport.is_connected());
        assert!(matches!(
            transport.send(Frame::new(0xFF, 0x00)).await,
            Err(TransportError::NotConnected)
        ));

        transport.connect().await.unwrap();
        assert!(transport.is_connected());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Byte transports between the host and a DALI gateway.
//!
//! A transport moves forward frames to the gateway and backward frames
//! (query answers) back. It knows nothing about DALI addressing or opcodes.
//!
//! # Transports
//!
//! - [`MockTransport`]: In-memory loopback answering `address ^ data`
//! - [`TcpTransport`]: Gateway reached over a TCP byte stream (feature `tcp`)
//! - [`SerialTransport`], [`HidTransport`]: Placeholders that fail fast
//!
//! [`Gateway`] wraps one of these, selected at runtime from a
//! [`GatewayConfig`].

mod mock;
mod stub;
#[cfg(feature = "tcp")]
mod tcp;

pub use mock::{MockLog, MockTransport};
pub use stub::{HidTransport, SerialTransport};
#[cfg(feature = "tcp")]
pub use tcp::TcpTransport;

use std::time::Duration;

use crate::config::GatewayConfig;
use crate::error::{ConfigError, TransportError};
use crate::frame::Frame;

/// A connection to a DALI gateway.
///
/// Implementations are driven by a single owner: every method takes
/// `&mut self` and the caller awaits each call before issuing the next.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Opens the connection. Connecting an open transport is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the gateway cannot be reached.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the transport cannot be closed.
    async fn disconnect(&mut self) -> Result<(), TransportError>;

    /// Sends one forward frame.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotConnected` if the transport is closed, or
    /// an I/O error if the write fails.
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Waits up to `timeout` for a backward frame.
    ///
    /// Returns `Ok(None)` if nothing arrived in time.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if reading fails.
    async fn recv(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError>;

    /// Returns true if the transport is open.
    fn is_connected(&self) -> bool;
}

/// A transport selected at runtime.
#[derive(Debug)]
pub enum Gateway {
    /// In-memory loopback.
    Mock(MockTransport),
    /// TCP gateway.
    #[cfg(feature = "tcp")]
    Tcp(TcpTransport),
    /// Serial gateway placeholder.
    Serial(SerialTransport),
    /// HID gateway placeholder.
    Hid(HidTransport),
}

impl Gateway {
    /// Builds the transport described by `config`. Nothing is opened yet.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUsbId` for an unparsable HID id, and
    /// `ConfigError::UnsupportedGateway` for a TCP gateway when the `tcp`
    /// feature is disabled.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let gateway = match config {
            GatewayConfig::Mock => Self::Mock(MockTransport::new()),
            #[cfg(feature = "tcp")]
            GatewayConfig::Tcp(tcp) => Self::Tcp(TcpTransport::new(tcp.clone())),
            #[cfg(not(feature = "tcp"))]
            GatewayConfig::Tcp(_) => {
                return Err(ConfigError::UnsupportedGateway("tcp".to_string()));
            }
            GatewayConfig::Serial(serial) => Self::Serial(SerialTransport::new(serial.clone())),
            GatewayConfig::Hid(hid) => Self::Hid(HidTransport::from_config(hid)?),
        };
        tracing::info!(transport = gateway.kind(), "Selected DALI gateway transport");
        Ok(gateway)
    }

    /// Returns the transport type name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mock(_) => "mock",
            #[cfg(feature = "tcp")]
            Self::Tcp(_) => "tcp",
            Self::Serial(_) => "serial",
            Self::Hid(_) => "hid",
        }
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::Mock(MockTransport::new())
    }
}

impl From<MockTransport> for Gateway {
    fn from(transport: MockTransport) -> Self {
        Self::Mock(transport)
    }
}

#[cfg(feature = "tcp")]
impl From<TcpTransport> for Gateway {
    fn from(transport: TcpTransport) -> Self {
        Self::Tcp(transport)
    }
}

macro_rules! dispatch {
    ($self:ident, $t:ident => $body:expr) => {
        match $self {
            Gateway::Mock($t) => $body,
            #[cfg(feature = "tcp")]
            Gateway::Tcp($t) => $body,
            Gateway::Serial($t) => $body,
            Gateway::Hid($t) => $body,
        }
    };
}

impl Transport for Gateway {
    async fn connect(&mut self) -> Result<(), TransportError> {
        dispatch!(self, t => t.connect().await)
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        dispatch!(self, t => t.disconnect().await)
    }

    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        dispatch!(self, t => t.send(frame).await)
    }

    async fn recv(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        dispatch!(self, t => t.recv(timeout).await)
    }

    fn is_connected(&self) -> bool {
        dispatch!(self, t => t.is_connected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HidConfig, SerialConfig, TcpConfig, UsbId};

    #[test]
    fn from_config_selects_variant() {
        let gw = Gateway::from_config(&GatewayConfig::Mock).unwrap();
        assert_eq!(gw.kind(), "mock");

        let gw = Gateway::from_config(&GatewayConfig::Serial(SerialConfig::default())).unwrap();
        assert_eq!(gw.kind(), "serial");
        assert!(!gw.is_connected());
    }

    #[cfg(feature = "tcp")]
    #[test]
    fn from_config_tcp() {
        let gw = Gateway::from_config(&GatewayConfig::Tcp(TcpConfig::default())).unwrap();
        assert_eq!(gw.kind(), "tcp");
        assert!(!gw.is_connected());
    }

    #[test]
    fn from_config_rejects_bad_hid_id() {
        let config = GatewayConfig::Hid(HidConfig {
            vendor_id: Some(UsbId::Text("nope".into())),
            ..HidConfig::default()
        });
        assert!(matches!(
            Gateway::from_config(&config),
            Err(ConfigError::InvalidUsbId(_))
        ));
    }

    #[tokio::test]
    async fn gateway_dispatches_to_mock() {
        let mut gw = Gateway::default();
        gw.connect().await.unwrap();
        assert!(gw.is_connected());
        gw.send(Frame::new(0x01, 0x90)).await.unwrap();
        gw.disconnect().await.unwrap();
        assert!(!gw.is_connected());
    }
}

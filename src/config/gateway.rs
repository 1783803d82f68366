// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway (transport) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SEC: f64 = 0.8;

fn timeout_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::from_millis(800))
}

/// Which gateway to talk to and how.
///
/// Deserialized from an object tagged by `type`, matched without regard to
/// case. A missing gateway section or a section without `type` selects the
/// in-memory mock; an unknown type is an error.
///
/// # Examples
///
/// ```
/// use dali_host::config::GatewayConfig;
///
/// let gw: GatewayConfig =
///     serde_json::from_str(r#"{"type": "tcp", "host": "10.0.0.5"}"#).unwrap();
/// let GatewayConfig::Tcp(tcp) = gw else { panic!("expected tcp") };
/// assert_eq!(tcp.host, "10.0.0.5");
/// assert_eq!(tcp.port, 5588);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase", try_from = "RawGateway")]
pub enum GatewayConfig {
    /// In-memory loopback, for development and tests.
    #[default]
    Mock,
    /// DALI gateway reached over a TCP byte stream.
    Tcp(TcpConfig),
    /// Serial (RS-232/USB-serial) gateway.
    Serial(SerialConfig),
    /// USB HID gateway.
    Hid(HidConfig),
}

impl GatewayConfig {
    /// Returns the gateway type name as used in configuration.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Tcp(_) => "tcp",
            Self::Serial(_) => "serial",
            Self::Hid(_) => "hid",
        }
    }
}

#[derive(Deserialize)]
struct RawGateway {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(flatten)]
    settings: Map<String, Value>,
}

impl TryFrom<RawGateway> for GatewayConfig {
    type Error = serde_json::Error;

    fn try_from(raw: RawGateway) -> Result<Self, Self::Error> {
        let Some(kind) = raw.kind else {
            return Ok(Self::Mock);
        };
        let settings = Value::Object(raw.settings);
        match kind.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "tcp" => serde_json::from_value(settings).map(Self::Tcp),
            "serial" => serde_json::from_value(settings).map(Self::Serial),
            "hid" => serde_json::from_value(settings).map(Self::Hid),
            _ => Err(serde::de::Error::unknown_variant(
                &kind,
                &["mock", "tcp", "serial", "hid"],
            )),
        }
    }
}

/// TCP gateway settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpConfig {
    /// Gateway host name or IP address.
    pub host: String,
    /// Gateway TCP port.
    pub port: u16,
    /// Connect and receive timeout in seconds.
    pub timeout_sec: f64,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5588,
            timeout_sec: DEFAULT_TIMEOUT_SEC,
        }
    }
}

impl TcpConfig {
    /// Creates a configuration for the given host with default port and
    /// timeout.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Sets the TCP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connect and receive timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_sec = timeout.as_secs_f64();
        self
    }

    /// Returns the timeout, falling back to the default if the configured
    /// value is negative or not finite.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        timeout_from_secs(self.timeout_sec)
    }
}

/// Serial gateway settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Serial port name (`COM1`, `/dev/ttyUSB0`, ...).
    pub port: String,
    /// Line speed.
    pub baudrate: u32,
    /// Receive timeout in seconds.
    pub timeout_sec: f64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "COM1".to_string(),
            baudrate: 19200,
            timeout_sec: DEFAULT_TIMEOUT_SEC,
        }
    }
}

impl SerialConfig {
    /// Returns the receive timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        timeout_from_secs(self.timeout_sec)
    }
}

/// A USB vendor or product id, written either as a number or as a string
/// (`"0x1234"` or `"4660"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsbId {
    /// Numeric id.
    Number(u16),
    /// Textual id, hex with `0x` prefix or decimal.
    Text(String),
}

impl UsbId {
    /// Resolves the id to its numeric value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUsbId` if the text is not a 16-bit
    /// number.
    pub fn resolve(&self) -> Result<u16, ConfigError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(text) => {
                let trimmed = text.trim();
                let parsed = match trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                {
                    Some(hex) => u16::from_str_radix(hex, 16),
                    None => trimmed.parse::<u16>(),
                };
                parsed.map_err(|_| ConfigError::InvalidUsbId(text.clone()))
            }
        }
    }
}

impl From<u16> for UsbId {
    fn from(id: u16) -> Self {
        Self::Number(id)
    }
}

/// USB HID gateway settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HidConfig {
    /// USB vendor id.
    #[serde(alias = "vid")]
    pub vendor_id: Option<UsbId>,
    /// USB product id.
    #[serde(alias = "pid")]
    pub product_id: Option<UsbId>,
    /// Receive timeout in seconds.
    pub timeout_sec: f64,
}

impl Default for HidConfig {
    fn default() -> Self {
        Self {
            vendor_id: None,
            product_id: None,
            timeout_sec: DEFAULT_TIMEOUT_SEC,
        }
    }
}

impl HidConfig {
    /// Returns the receive timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        timeout_from_secs(self.timeout_sec)
    }
}

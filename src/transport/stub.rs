// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serial and HID gateway placeholders.
//!
//! Both keep their configuration so they can be selected and inspected, but
//! every I/O operation fails with [`TransportError::NotImplemented`].

use std::time::Duration;

use super::Transport;
use crate::config::{HidConfig, SerialConfig, UsbId};
use crate::error::{ConfigError, TransportError};
use crate::frame::Frame;

/// Serial gateway placeholder.
#[derive(Debug, Clone)]
pub struct SerialTransport {
    config: SerialConfig,
}

impl SerialTransport {
    /// Creates the placeholder.
    #[must_use]
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }

    /// Returns the serial port name.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.config.port
    }

    /// Returns the configured line speed.
    #[must_use]
    pub fn baudrate(&self) -> u32 {
        self.config.baudrate
    }

    /// Returns the configured receive timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }
}

impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        tracing::warn!(port = %self.config.port, "Serial transport is not implemented");
        Err(TransportError::NotImplemented("serial"))
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        Err(TransportError::NotImplemented("serial"))
    }

    async fn send(&mut self, _frame: Frame) -> Result<(), TransportError> {
        Err(TransportError::NotImplemented("serial"))
    }

    async fn recv(&mut self, _timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        Err(TransportError::NotImplemented("serial"))
    }

    fn is_connected(&self) -> bool {
        false
    }
}

/// USB HID gateway placeholder.
#[derive(Debug, Clone)]
pub struct HidTransport {
    vendor_id: Option<u16>,
    product_id: Option<u16>,
    timeout: Duration,
}

impl HidTransport {
    /// Creates the placeholder, resolving textual USB ids.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUsbId` if an id cannot be parsed.
    pub fn from_config(config: &HidConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            vendor_id: config.vendor_id.as_ref().map(UsbId::resolve).transpose()?,
            product_id: config.product_id.as_ref().map(UsbId::resolve).transpose()?,
            timeout: config.timeout(),
        })
    }

    /// Returns the USB vendor id.
    #[must_use]
    pub const fn vendor_id(&self) -> Option<u16> {
        self.vendor_id
    }

    /// Returns the USB product id.
    #[must_use]
    pub const fn product_id(&self) -> Option<u16> {
        self.product_id
    }

    /// Returns the configured receive timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for HidTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        tracing::warn!(
            vendor_id = ?self.vendor_id,
            product_id = ?self.product_id,
            "HID transport is not implemented"
        );
        Err(TransportError::NotImplemented("hid"))
    }

    async fn disconnect(&mut self) -> Result<(), TransportError> {
        Err(TransportError::NotImplemented("hid"))
    }

    async fn send(&mut self, _frame: Frame) -> Result<(), TransportError> {
        Err(TransportError::NotImplemented("hid"))
    }

    async fn recv(&mut self, _timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        Err(TransportError::NotImplemented("hid"))
    }

    fn is_connected(&self) -> bool {
        false
    }
}

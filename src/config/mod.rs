// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller configuration.
//!
//! The configuration is plain data with serde defaults for every field, so a
//! host that has already loaded and merged its configuration files can map
//! the result straight onto [`ControllerConfig`]. File discovery and merging
//! are left to the host.
//!
//! # Examples
//!
//! ```
//! use dali_host::config::{ControllerConfig, GatewayConfig};
//!
//! let config = ControllerConfig::from_json_str(
//!     r#"{
//!         "gateway": {"type": "tcp", "host": "192.168.1.40", "port": 5588},
//!         "tc": {"kelvin_min": 2200, "kelvin_max": 6500}
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.gateway.kind(), "tcp");
//! assert_eq!(config.tc.kelvin_min, 2200);
//! assert_eq!(config.ops.recall_scene_base, 0x40);
//! assert_eq!(config.presets.len(), 7);
//! ```

mod gateway;
mod opcodes;

pub use gateway::{GatewayConfig, HidConfig, SerialConfig, TcpConfig, UsbId};
pub use opcodes::{OpcodeTable, TcRange};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::preset::{Preset, default_presets};

/// Everything needed to build a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Gateway selection and settings.
    pub gateway: GatewayConfig,
    /// Allowed colour temperature range.
    pub tc: TcRange,
    /// Opcode table.
    pub ops: OpcodeTable,
    /// Colour presets offered to the user.
    pub presets: Vec<Preset>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            tc: TcRange::default(),
            ops: OpcodeTable::default(),
            presets: default_presets(),
        }
    }
}

impl ControllerConfig {
    /// Creates a default configuration for the given gateway.
    #[must_use]
    pub fn new(gateway: GatewayConfig) -> Self {
        Self {
            gateway,
            ..Self::default()
        }
    }

    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the text is not a valid configuration,
    /// or a validation error from [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the parts that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTcRange` for an empty colour temperature
    /// range and `ConfigError::InvalidUsbId` for an unparsable HID id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tc.validate()?;
        if let GatewayConfig::Hid(hid) = &self.gateway {
            for id in [&hid.vendor_id, &hid.product_id].into_iter().flatten() {
                id.resolve()?;
            }
        }
        Ok(())
    }

    /// Sets the colour temperature range.
    #[must_use]
    pub fn with_tc_range(mut self, tc: TcRange) -> Self {
        self.tc = tc;
        self
    }

    /// Sets the opcode table.
    #[must_use]
    pub fn with_opcodes(mut self, ops: OpcodeTable) -> Self {
        self.ops = ops;
        self
    }

    /// Replaces the preset list.
    #[must_use]
    pub fn with_presets(mut self, presets: Vec<Preset>) -> Self {
        self.presets = presets;
        self
    }
}

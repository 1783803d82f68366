// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `dali_host` - A host-side controller for the DALI lighting bus.
//!
//! This library turns lighting intents into the 2-byte forward frames a DALI
//! bus expects and sends them to a gateway over a pluggable async
//! transport.
//!
//! # Supported Features
//!
//! - **Arc power**: Direct level control of devices, groups and broadcast
//! - **Scenes**: Recall, store and remove scenes 0-15
//! - **Groups**: Add and remove group membership, query membership
//! - **Colour (DT8)**: Colour temperature, CIE xy chromaticity, RGBW primaries
//! - **Queries**: Status, group membership, scene levels, bus scan
//! - **Bulk**: Apply group plans, scene plans and colour presets
//!
//! # Supported Gateways
//!
//! - TCP byte-stream gateways (feature `tcp`, enabled by default)
//! - In-memory mock for development and tests
//! - Serial and HID placeholders that fail with `NotImplemented`
//!
//! # Quick Start
//!
//! ```no_run
//! use dali_host::config::{ControllerConfig, GatewayConfig, TcpConfig};
//! use dali_host::{Controller, Target};
//!
//! #[tokio::main]
//! async fn main() -> dali_host::Result<()> {
//!     let config = ControllerConfig::new(GatewayConfig::Tcp(TcpConfig::new("192.168.1.40")));
//!     let mut controller = Controller::from_config(&config)?;
//!     controller.connect().await?;
//!
//!     // Everything to half brightness
//!     controller.send_arc(Target::broadcast(), 127).await?;
//!
//!     // Warm white on group 3
//!     controller.dt8_set_tc_kelvin(Target::group(3), 2700).await?;
//!
//!     // Who is out there?
//!     let found = controller
//!         .scan_devices(0..=63, dali_host::DEFAULT_QUERY_TIMEOUT)
//!         .await?;
//!     println!("devices: {found:?}");
//!
//!     controller.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library emits [`tracing`] events (frames at `debug`, connection
//! changes at `info`) and never installs a subscriber.

mod controller;

pub mod config;
pub mod error;
pub mod frame;
pub mod preset;
pub mod response;
pub mod state;
pub mod transport;
pub mod types;

pub use config::{ControllerConfig, GatewayConfig, OpcodeTable, TcRange};
pub use controller::{Controller, DEFAULT_QUERY_TIMEOUT};
pub use error::{ConfigError, Error, ParseError, Result, TransportError, ValueError};
pub use frame::{Frame, format_frames, make_forward_frame, parse_frames};
pub use preset::{Preset, PresetKind, PresetOutcome, default_presets, merge_presets};
pub use response::{
    ChromaticitySetting, ColorTemperatureSetting, GroupMembership, PrimarySetting, SceneLevels,
};
pub use state::{GroupEntry, SceneEntry};
pub use transport::{Gateway, MockTransport, Transport};
pub use types::{
    Address, AddressMode, ArcLevel, ColorChannel, GearStatus, GroupAddress, Scene, ShortAddress,
    Target,
};

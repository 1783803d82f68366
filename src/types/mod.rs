// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for DALI bus control.
//!
//! Identifiers (short addresses, groups, scenes) are validated when they are
//! constructed. Continuous values (arc levels, colour temperature,
//! chromaticity) are clamped instead.
//!
//! # Types
//!
//! - [`Target`] / [`Address`] - Who a command is for, and its address byte
//! - [`ShortAddress`] - Single device (0-63)
//! - [`GroupAddress`] - Group number (0-15)
//! - [`Scene`] - Scene number (0-15)
//! - [`ArcLevel`] - Direct arc power level (0-254)
//! - [`ColorChannel`] - DT8 primary colour channel name
//! - [`GearStatus`] - Decoded status query answer

mod address;
mod color;
mod level;
mod status;

pub use address::{
    Address, AddressMode, GroupAddress, MAX_GROUP, MAX_SHORT_ADDRESS, ShortAddress, Target,
    addr_broadcast, addr_group, addr_short,
};
pub use color::{
    ColorChannel, MIREK_MAX, MIREK_MIN, clamp_mirek, kelvin_from_mirek, mirek_from_kelvin,
    quantize_coordinate, split_dtr,
};
pub use level::{ArcLevel, MAX_SCENE, Scene};
pub use status::GearStatus;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opcode table and colour temperature range.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;
use crate::types::ColorChannel;

/// Opcodes and special address bytes used by the controller.
///
/// Every field has a default, so a partial table in a configuration file
/// only overrides what it names. The defaults match common DALI gateways;
/// some of them (notably `remove_from_scene_base`, which shares `0x90` with
/// `query_status`) are gateway conventions rather than IEC 62386 values.
///
/// # Examples
///
/// ```
/// use dali_host::config::OpcodeTable;
///
/// let ops: OpcodeTable = serde_json::from_str(r#"{"recall_scene_base": 16}"#).unwrap();
/// assert_eq!(ops.recall_scene_base, 16);
/// assert_eq!(ops.write_dtr, 0xA3);
/// assert_eq!(ops.primary_opcode(&"R".into()), Some(0xE2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpcodeTable {
    /// `GO TO SCENE 0`; scene `n` uses `base + n`.
    pub recall_scene_base: u8,
    /// `STORE DTR AS SCENE 0`.
    pub store_dtr_as_scene_base: u8,
    /// `REMOVE FROM SCENE 0`.
    pub remove_from_scene_base: u8,
    /// `ADD TO GROUP 0`.
    pub add_to_group_base: u8,
    /// `REMOVE FROM GROUP 0`.
    pub remove_from_group_base: u8,
    /// Opcode sent to the target to load DTR during scene storage.
    pub write_dtr: u8,
    /// `QUERY STATUS`.
    pub query_status: u8,
    /// `QUERY GROUPS 0-7`.
    pub query_groups_0_7: u8,
    /// `QUERY GROUPS 8-15`.
    pub query_groups_8_15: u8,
    /// `QUERY SCENE LEVEL 0`.
    pub query_scene_level_base: u8,
    /// Special address byte of `DTR0`.
    pub write_dtr0_addr: u8,
    /// Special address byte of `DTR1`.
    pub write_dtr1_addr: u8,
    /// Special address byte of `ENABLE DEVICE TYPE`.
    pub dt8_enable_addr: u8,
    /// DT8 `SET TEMPORARY COLOUR TEMPERATURE`.
    pub dt8_set_tc_opcode: u8,
    /// DT8 `SET TEMPORARY X-COORDINATE`.
    pub dt8_set_x_opcode: u8,
    /// DT8 `SET TEMPORARY Y-COORDINATE`.
    pub dt8_set_y_opcode: u8,
    /// DT8 primary channel opcodes, keyed by channel name.
    ///
    /// Entries in a configuration file are merged over the `r`, `g`, `b`
    /// and `w` defaults.
    #[serde(deserialize_with = "deserialize_primaries")]
    pub dt8_set_primary: BTreeMap<String, u8>,
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self {
            recall_scene_base: 0x40,
            store_dtr_as_scene_base: 0x50,
            remove_from_scene_base: 0x90,
            add_to_group_base: 0x60,
            remove_from_group_base: 0x70,
            write_dtr: 0xA3,
            query_status: 0x90,
            query_groups_0_7: 0xC0,
            query_groups_8_15: 0xC1,
            query_scene_level_base: 0xB0,
            write_dtr0_addr: 0xA3,
            write_dtr1_addr: 0xC3,
            dt8_enable_addr: 0xC1,
            dt8_set_tc_opcode: 0xE7,
            dt8_set_x_opcode: 0xE0,
            dt8_set_y_opcode: 0xE1,
            dt8_set_primary: default_primaries(),
        }
    }
}

fn default_primaries() -> BTreeMap<String, u8> {
    [("r", 0xE2), ("g", 0xE3), ("b", 0xE4), ("w", 0xE5)]
        .into_iter()
        .map(|(name, op)| (name.to_string(), op))
        .collect()
}

fn insert_primary(primaries: &mut BTreeMap<String, u8>, channel: &str, opcode: u8) {
    let channel = ColorChannel::new(channel);
    primaries.retain(|name, _| !name.trim().eq_ignore_ascii_case(channel.as_str()));
    primaries.insert(channel.as_str().to_string(), opcode);
}

fn deserialize_primaries<'de, D>(deserializer: D) -> Result<BTreeMap<String, u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, u8>::deserialize(deserializer)?;
    let mut primaries = default_primaries();
    for (channel, opcode) in &overrides {
        insert_primary(&mut primaries, channel, *opcode);
    }
    Ok(primaries)
}

impl OpcodeTable {
    /// Looks up the opcode of a primary channel, ignoring case.
    #[must_use]
    pub fn primary_opcode(&self, channel: &ColorChannel) -> Option<u8> {
        self.dt8_set_primary
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(channel.as_str()))
            .map(|(_, op)| *op)
    }

    /// Adds or replaces a primary channel opcode.
    #[must_use]
    pub fn with_primary(mut self, channel: &str, opcode: u8) -> Self {
        insert_primary(&mut self.dt8_set_primary, channel, opcode);
        self
    }
}

/// Allowed colour temperature range in Kelvin.
///
/// Requests outside the range are clamped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcRange {
    /// Warmest allowed colour temperature.
    pub kelvin_min: u32,
    /// Coolest allowed colour temperature.
    pub kelvin_max: u32,
}

impl Default for TcRange {
    fn default() -> Self {
        Self {
            kelvin_min: 1700,
            kelvin_max: 8000,
        }
    }
}

impl TcRange {
    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTcRange` if the range is empty or starts
    /// at zero.
    pub fn new(kelvin_min: u32, kelvin_max: u32) -> Result<Self, ConfigError> {
        let range = Self {
            kelvin_min,
            kelvin_max,
        };
        range.validate()?;
        Ok(range)
    }

    /// Checks that `1 <= kelvin_min <= kelvin_max`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTcRange` otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kelvin_min == 0 || self.kelvin_min > self.kelvin_max {
            return Err(ConfigError::InvalidTcRange {
                min: self.kelvin_min,
                max: self.kelvin_max,
            });
        }
        Ok(())
    }

    /// Clamps a requested colour temperature into the range.
    #[must_use]
    pub fn clamp(&self, kelvin: u32) -> u32 {
        kelvin.max(self.kelvin_min).min(self.kelvin_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_values() {
        let ops = OpcodeTable::default();
        assert_eq!(ops.recall_scene_base, 64);
        assert_eq!(ops.store_dtr_as_scene_base, 80);
        assert_eq!(ops.query_groups_8_15, 193);
        assert_eq!(ops.dt8_enable_addr, 193);
        assert_eq!(ops.dt8_set_tc_opcode, 231);
        assert_eq!(ops.dt8_set_primary.len(), 4);
    }

    #[test]
    fn partial_table_keeps_defaults() {
        let ops: OpcodeTable =
            serde_json::from_str(r#"{"write_dtr": 1, "dt8_set_primary": {"A": 234}}"#).unwrap();
        assert_eq!(ops.write_dtr, 1);
        assert_eq!(ops.recall_scene_base, 0x40);
        assert_eq!(ops.primary_opcode(&ColorChannel::new("a")), Some(234));
        assert_eq!(ops.primary_opcode(&ColorChannel::red()), Some(0xE2));
        assert_eq!(ops.dt8_set_primary.len(), 5);
    }

    #[test]
    fn primary_overrides_merge_over_defaults() {
        let ops: OpcodeTable =
            serde_json::from_str(r#"{"dt8_set_primary": {"R": 16, "w": 17}}"#).unwrap();
        assert_eq!(ops.primary_opcode(&ColorChannel::red()), Some(16));
        assert_eq!(ops.primary_opcode(&ColorChannel::new("w")), Some(17));
        assert_eq!(ops.primary_opcode(&ColorChannel::new("g")), Some(0xE3));
        assert_eq!(ops.dt8_set_primary.len(), 4);
    }

    #[test]
    fn with_primary_replaces_case_insensitively() {
        let ops = OpcodeTable::default().with_primary("R", 0x10);
        assert_eq!(ops.primary_opcode(&ColorChannel::red()), Some(0x10));
        assert_eq!(ops.dt8_set_primary.len(), 4);
    }

    #[test]
    fn tc_range_validation() {
        assert!(TcRange::new(1700, 8000).is_ok());
        assert!(TcRange::new(3000, 3000).is_ok());
        assert!(matches!(
            TcRange::new(8000, 1700),
            Err(ConfigError::InvalidTcRange { min: 8000, max: 1700 })
        ));
        assert!(TcRange::new(0, 100).is_err());
    }

    #[test]
    fn tc_range_clamps() {
        let range = TcRange::default();
        assert_eq!(range.clamp(1000), 1700);
        assert_eq!(range.clamp(9000), 8000);
        assert_eq!(range.clamp(4000), 4000);
    }
}

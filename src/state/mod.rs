// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Desired group and scene assignments for a set of devices.
//!
//! These entries are the data-interchange form of a bus commissioning plan.
//! They are applied with [`Controller::apply_groups`] and
//! [`Controller::apply_scenes`]; reading and writing them from files is up
//! to the host.
//!
//! # Examples
//!
//! ```
//! use dali_host::state::{GroupEntry, SceneEntry};
//!
//! let groups: Vec<GroupEntry> =
//!     serde_json::from_str(r#"[{"short": 3, "groups": [0, 4]}]"#).unwrap();
//! assert_eq!(groups[0].groups, vec![0, 4]);
//!
//! let scenes: Vec<SceneEntry> =
//!     serde_json::from_str(r#"[{"short": 3, "levels": {"2": 128, "5": 254}}]"#).unwrap();
//! assert_eq!(scenes[0].levels.get(&5), Some(&254));
//! ```
//!
//! [`Controller::apply_groups`]: crate::Controller::apply_groups
//! [`Controller::apply_scenes`]: crate::Controller::apply_scenes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::{GroupAddress, Scene, ShortAddress};

/// Group membership wanted for one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    /// Short address of the device (0-63).
    pub short: u8,
    /// Groups the device should belong to (0-15).
    #[serde(default)]
    pub groups: Vec<u8>,
}

impl GroupEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(short: u8, groups: impl IntoIterator<Item = u8>) -> Self {
        Self {
            short,
            groups: groups.into_iter().collect(),
        }
    }

    /// Validates the entry, returning the address and the wanted groups
    /// sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for a bad short address or group.
    pub fn validate(&self) -> Result<(ShortAddress, Vec<GroupAddress>), ValueError> {
        let short = ShortAddress::new(self.short)?;
        let mut groups = self
            .groups
            .iter()
            .map(|g| GroupAddress::new(*g))
            .collect::<Result<Vec<_>, _>>()?;
        groups.sort_unstable();
        groups.dedup();
        Ok((short, groups))
    }
}

/// Scene levels wanted for one device, keyed by scene number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntry {
    /// Short address of the device (0-63).
    pub short: u8,
    /// Level (0-254) per scene (0-15).
    #[serde(default)]
    pub levels: BTreeMap<u8, u8>,
}

impl SceneEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(short: u8, levels: impl IntoIterator<Item = (u8, u8)>) -> Self {
        Self {
            short,
            levels: levels.into_iter().collect(),
        }
    }

    /// Validates the entry, returning the address and `(scene, level)`
    /// pairs in ascending scene order.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for a bad short address, scene, or
    /// a level of 255.
    pub fn validate(&self) -> Result<(ShortAddress, Vec<(Scene, u8)>), ValueError> {
        let short = ShortAddress::new(self.short)?;
        let levels = self
            .levels
            .iter()
            .map(|(scene, level)| {
                if *level > 254 {
                    return Err(ValueError::OutOfRange {
                        min: 0,
                        max: 254,
                        actual: u16::from(*level),
                    });
                }
                Ok((Scene::new(*scene)?, *level))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((short, levels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_entry_sorts_and_dedups() {
        let (short, groups) = GroupEntry::new(5, [4, 1, 4]).validate().unwrap();
        assert_eq!(short.value(), 5);
        let groups: Vec<u8> = groups.iter().map(GroupAddress::value).collect();
        assert_eq!(groups, vec![1, 4]);
    }

    #[test]
    fn group_entry_rejects_bad_values() {
        assert!(GroupEntry::new(64, [0]).validate().is_err());
        assert!(GroupEntry::new(0, [16]).validate().is_err());
    }

    #[test]
    fn scene_entry_validation() {
        let (_, levels) = SceneEntry::new(1, [(5, 254), (2, 0)]).validate().unwrap();
        let levels: Vec<(u8, u8)> = levels.iter().map(|(s, l)| (s.value(), *l)).collect();
        assert_eq!(levels, vec![(2, 0), (5, 254)]);
        assert!(SceneEntry::new(1, [(16, 0)]).validate().is_err());
        assert!(SceneEntry::new(1, [(0, 255)]).validate().is_err());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let entry: GroupEntry = serde_json::from_str(r#"{"short": 2}"#).unwrap();
        assert!(entry.groups.is_empty());
    }
}

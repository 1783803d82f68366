// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded answers of multi-query operations.

use std::fmt;

use serde::Serialize;

use crate::types::{GroupAddress, Scene};

/// Group membership of one device, groups 0-15.
///
/// # Examples
///
/// ```
/// use dali_host::response::GroupMembership;
///
/// let membership = GroupMembership::from_responses(Some(0b0000_0101), Some(0b0000_0001));
/// assert_eq!(membership.groups().collect::<Vec<_>>(), vec![0, 2, 8]);
/// assert!(membership.contains(8));
/// assert!(!membership.contains(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GroupMembership([bool; 16]);

impl GroupMembership {
    /// Decodes the answers of `QUERY GROUPS 0-7` and `QUERY GROUPS 8-15`.
    ///
    /// A missing answer leaves that half empty.
    #[must_use]
    pub fn from_responses(low: Option<u8>, high: Option<u8>) -> Self {
        let mut groups = [false; 16];
        for (half, bits) in [low, high].into_iter().enumerate() {
            if let Some(bits) = bits {
                for bit in 0..8 {
                    groups[half * 8 + bit] = bits & (1 << bit) != 0;
                }
            }
        }
        Self(groups)
    }

    /// Returns true if the device belongs to `group`.
    ///
    /// Groups above 15 are never members.
    #[must_use]
    pub fn contains(&self, group: u8) -> bool {
        self.0.get(usize::from(group)).copied().unwrap_or(false)
    }

    /// Iterates over the member group numbers in ascending order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn groups(&self) -> impl Iterator<Item = u8> + '_ {
        // Safe: index is below 16
        self.0
            .iter()
            .enumerate()
            .filter(|(_, member)| **member)
            .map(|(index, _)| index as u8)
    }

    /// Returns the membership flags indexed by group number.
    #[must_use]
    pub const fn as_array(&self) -> &[bool; 16] {
        &self.0
    }
}

impl From<GroupMembership> for [bool; 16] {
    fn from(membership: GroupMembership) -> Self {
        membership.0
    }
}

impl fmt::Display for GroupMembership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .groups()
            .filter_map(|g| GroupAddress::new(g).ok())
            .map(|g| g.to_string())
            .collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(" "))
        }
    }
}

/// Stored level of each scene of one device.
///
/// `None` means the device gave no answer for that scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SceneLevels([Option<u8>; 16]);

impl SceneLevels {
    /// Wraps per-scene answers indexed by scene number.
    #[must_use]
    pub const fn new(levels: [Option<u8>; 16]) -> Self {
        Self(levels)
    }

    /// Returns the stored level of a scene.
    #[must_use]
    pub fn get(&self, scene: Scene) -> Option<u8> {
        self.0[usize::from(scene.value())]
    }

    /// Iterates over `(scene, level)` pairs that had an answer.
    pub fn answered(&self) -> impl Iterator<Item = (Scene, u8)> + '_ {
        Scene::all()
            .zip(self.0.iter())
            .filter_map(|(scene, level)| level.map(|l| (scene, l)))
    }

    /// Returns the answers indexed by scene number.
    #[must_use]
    pub const fn as_array(&self) -> &[Option<u8>; 16] {
        &self.0
    }
}

impl From<SceneLevels> for [Option<u8>; 16] {
    fn from(levels: SceneLevels) -> Self {
        levels.0
    }
}

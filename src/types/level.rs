// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arc power levels and scene numbers.

use std::fmt;

use crate::error::ValueError;

/// Direct arc power level (0-254).
///
/// Level 255 is the DALI "mask" value (no change) and is never sent as a
/// level. Unlike addresses, levels are continuous values and out-of-range
/// requests are clamped.
///
/// # Examples
///
/// ```
/// use dali_host::types::ArcLevel;
///
/// assert_eq!(ArcLevel::clamped(128).value(), 128);
/// assert_eq!(ArcLevel::clamped(255).value(), 254);
/// assert_eq!(ArcLevel::OFF.value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ArcLevel(u8);

impl ArcLevel {
    /// Lamp off.
    pub const OFF: Self = Self(0);

    /// Maximum arc power.
    pub const MAX: Self = Self(254);

    /// Creates a level, clamping to 0-254.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Returns the level value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ArcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Highest scene number.
pub const MAX_SCENE: u8 = 15;

/// A validated scene number (0-15).
///
/// ```
/// use dali_host::types::Scene;
///
/// assert_eq!(Scene::new(15).unwrap().value(), 15);
/// assert!(Scene::new(16).is_err());
/// assert_eq!(Scene::masked(18).value(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scene(u8);

impl Scene {
    /// Creates a scene number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `value` exceeds 15.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > MAX_SCENE {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(MAX_SCENE),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a scene number from the low four bits of `value`.
    #[must_use]
    pub const fn masked(value: u8) -> Self {
        Self(value & MAX_SCENE)
    }

    /// Returns the scene number.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Iterates over all sixteen scenes in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=MAX_SCENE).map(Self)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene {}", self.0)
    }
}

impl TryFrom<u8> for Scene {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_clamps_only_mask_value() {
        for v in 0..=254u8 {
            assert_eq!(ArcLevel::clamped(v).value(), v);
        }
        assert_eq!(ArcLevel::clamped(255), ArcLevel::MAX);
    }

    #[test]
    fn scene_range() {
        assert!(Scene::new(0).is_ok());
        assert_eq!(
            Scene::new(16),
            Err(ValueError::OutOfRange {
                min: 0,
                max: 15,
                actual: 16,
            })
        );
    }

    #[test]
    fn scene_all_is_ordered() {
        let scenes: Vec<u8> = Scene::all().map(|s| s.value()).collect();
        assert_eq!(scenes, (0..16).collect::<Vec<u8>>());
    }
}

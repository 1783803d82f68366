// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named colour presets.
//!
//! A preset is one of the three DT8 colour modes with its values. Presets
//! are plain data: they come from configuration, from a user file or from
//! [`default_presets`], and are applied with
//! [`Controller::apply_preset`](crate::Controller::apply_preset).
//!
//! # Examples
//!
//! ```
//! use dali_host::preset::{Preset, PresetKind};
//!
//! let preset: Preset =
//!     serde_json::from_str(r#"{"name": "warm", "mode": "tc", "kelvin": 2700}"#).unwrap();
//! assert_eq!(preset, Preset::tc("warm", 2700));
//!
//! let preset: Preset = serde_json::from_str(
//!     r#"{"name": "amber", "mode": "rgbw", "values": {"r": 254, "g": 120}}"#,
//! )
//! .unwrap();
//! assert!(matches!(preset.kind, PresetKind::Rgbw { values } if values.b == 0));
//! ```

use serde::{Deserialize, Serialize};

use crate::response::{ChromaticitySetting, ColorTemperatureSetting, PrimarySetting};

/// A named colour preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name, unique within a preset list.
    #[serde(default)]
    pub name: String,
    /// Colour mode and values.
    #[serde(flatten)]
    pub kind: PresetKind,
}

/// Colour mode of a preset, tagged by `mode` in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PresetKind {
    /// Direct primary levels.
    Rgbw {
        /// Level per channel.
        values: RgbwLevels,
    },
    /// Colour temperature.
    Tc {
        /// Colour temperature in Kelvin.
        kelvin: u32,
    },
    /// CIE 1931 chromaticity.
    Xy {
        /// Coordinates.
        values: XyPoint,
    },
}

/// Primary channel levels; a missing channel is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RgbwLevels {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// White.
    pub w: u8,
}

/// A chromaticity coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyPoint {
    /// CIE 1931 x.
    pub x: f64,
    /// CIE 1931 y.
    pub y: f64,
}

impl Preset {
    /// Creates an RGBW preset.
    #[must_use]
    pub fn rgbw(name: impl Into<String>, r: u8, g: u8, b: u8, w: u8) -> Self {
        Self {
            name: name.into(),
            kind: PresetKind::Rgbw {
                values: RgbwLevels { r, g, b, w },
            },
        }
    }

    /// Creates a colour temperature preset.
    #[must_use]
    pub fn tc(name: impl Into<String>, kelvin: u32) -> Self {
        Self {
            name: name.into(),
            kind: PresetKind::Tc { kelvin },
        }
    }

    /// Creates a chromaticity preset.
    #[must_use]
    pub fn xy(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            kind: PresetKind::Xy {
                values: XyPoint { x, y },
            },
        }
    }
}

/// What applying a preset sent to the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetOutcome {
    /// Four primary settings in the order r, g, b, w.
    Rgbw([PrimarySetting; 4]),
    /// Colour temperature setting.
    Tc(ColorTemperatureSetting),
    /// Chromaticity setting.
    Xy(ChromaticitySetting),
}

/// The built-in preset list: saturated red, green and blue, three white
/// points and D65.
#[must_use]
pub fn default_presets() -> Vec<Preset> {
    vec![
        Preset::rgbw("red", 254, 0, 0, 0),
        Preset::rgbw("green", 0, 254, 0, 0),
        Preset::rgbw("blue", 0, 0, 254, 0),
        Preset::tc("warm white (2700K)", 2700),
        Preset::tc("neutral white (4000K)", 4000),
        Preset::tc("cool white (6500K)", 6500),
        Preset::xy("D65", 0.3127, 0.3290),
    ]
}

/// Merges two preset lists by name.
///
/// A user preset replaces a base preset of the same name in place; new names
/// are appended in order. Unnamed presets get a generated name
/// (`preset-N` in the base list, `user-N` in the user list).
///
/// # Examples
///
/// ```
/// use dali_host::preset::{Preset, default_presets, merge_presets};
///
/// let merged = merge_presets(&default_presets(), &[Preset::tc("red", 3000)]);
/// assert_eq!(merged.len(), 7);
/// assert_eq!(merged[0], Preset::tc("red", 3000));
/// ```
#[must_use]
pub fn merge_presets(base: &[Preset], user: &[Preset]) -> Vec<Preset> {
    let mut merged: Vec<Preset> = Vec::with_capacity(base.len() + user.len());
    for (index, preset) in base.iter().enumerate() {
        let name = if preset.name.is_empty() {
            format!("preset-{index}")
        } else {
            preset.name.clone()
        };
        upsert(&mut merged, name, preset.kind);
    }
    for preset in user {
        let name = if preset.name.is_empty() {
            format!("user-{}", merged.len())
        } else {
            preset.name.clone()
        };
        upsert(&mut merged, name, preset.kind);
    }
    merged
}

fn upsert(presets: &mut Vec<Preset>, name: String, kind: PresetKind) {
    match presets.iter_mut().find(|p| p.name == name) {
        Some(existing) => existing.kind = kind,
        None => presets.push(Preset { name, kind }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_contents() {
        let presets = default_presets();
        assert_eq!(presets.len(), 7);
        assert_eq!(presets[3], Preset::tc("warm white (2700K)", 2700));
        assert!(matches!(
            presets[6].kind,
            PresetKind::Xy { values } if (values.x - 0.3127).abs() < 1e-9
        ));
    }

    #[test]
    fn merge_appends_new_names_in_order() {
        let base = vec![Preset::tc("a", 2000), Preset::tc("b", 3000)];
        let user = vec![Preset::tc("c", 4000), Preset::tc("a", 5000)];
        let merged = merge_presets(&base, &user);
        let names: Vec<&str> = merged.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(merged[0].kind, PresetKind::Tc { kelvin: 5000 });
    }

    #[test]
    fn merge_names_unnamed_presets() {
        let base = vec![Preset::tc("", 2000)];
        let user = vec![Preset::tc("", 3000)];
        let merged = merge_presets(&base, &user);
        assert_eq!(merged[0].name, "preset-0");
        assert_eq!(merged[1].name, "user-1");
    }

    #[test]
    fn presets_serialize_with_mode_tag() {
        let json = serde_json::to_value(Preset::xy("D65", 0.3127, 0.329)).unwrap();
        assert_eq!(json["mode"], "xy");
        assert_eq!(json["values"]["y"], 0.329);
        assert_eq!(json["name"], "D65");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<Preset>(r#"{"name": "x", "mode": "hsv"}"#).is_err());
    }
}

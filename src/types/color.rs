// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colour value conversions for Device Type 8 (colour control) gear.
//!
//! DT8 colour temperature is carried in mirek (micro reciprocal degrees,
//! `1_000_000 / kelvin`) as a 16-bit value. Mirek 0 and 65535 have special
//! meaning on the bus and are never produced here. CIE 1931 chromaticity
//! coordinates are carried as 16-bit fractions of 1.0.

use std::cmp::Ordering;
use std::fmt;

/// Smallest mirek value that may be sent.
pub const MIREK_MIN: u32 = 1;

/// Largest mirek value that may be sent.
pub const MIREK_MAX: u32 = 65534;

const MIREK_SCALE: u32 = 1_000_000;

/// Converts Kelvin to mirek, rounding to nearest (ties to even) and
/// clamping to [`MIREK_MIN`]..=[`MIREK_MAX`].
///
/// ```
/// use dali_host::types::mirek_from_kelvin;
///
/// assert_eq!(mirek_from_kelvin(4000), 250);
/// assert_eq!(mirek_from_kelvin(2700), 370);
/// assert_eq!(mirek_from_kelvin(3200), 312);
/// assert_eq!(mirek_from_kelvin(0), 65534);
/// ```
#[must_use]
pub fn mirek_from_kelvin(kelvin: u32) -> u16 {
    if kelvin == 0 {
        return clamp_mirek(MIREK_MAX);
    }
    clamp_mirek(rounded_div(MIREK_SCALE, kelvin))
}

/// Converts mirek to Kelvin, rounding to nearest (ties to even).
///
/// A mirek of 0 is treated as 1.
///
/// ```
/// use dali_host::types::kelvin_from_mirek;
///
/// assert_eq!(kelvin_from_mirek(250), 4000);
/// assert_eq!(kelvin_from_mirek(370), 2703);
/// ```
#[must_use]
pub fn kelvin_from_mirek(mirek: u16) -> u32 {
    rounded_div(MIREK_SCALE, u32::from(mirek).max(MIREK_MIN))
}

/// Clamps an arbitrary mirek request into the sendable range.
///
/// ```
/// use dali_host::types::clamp_mirek;
///
/// assert_eq!(clamp_mirek(0), 1);
/// assert_eq!(clamp_mirek(70_000), 65534);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn clamp_mirek(mirek: u32) -> u16 {
    // Safe: clamped to MIREK_MAX which fits in u16
    mirek.clamp(MIREK_MIN, MIREK_MAX) as u16
}

/// Quantizes a chromaticity coordinate to its 16-bit bus representation.
///
/// The value is scaled by 65535, rounded (ties to even) and clamped; NaN
/// maps to 0.
///
/// ```
/// use dali_host::types::quantize_coordinate;
///
/// assert_eq!(quantize_coordinate(0.0), 0);
/// assert_eq!(quantize_coordinate(1.0), 65535);
/// assert_eq!(quantize_coordinate(0.3127), 20493);
/// assert_eq!(quantize_coordinate(1.5), 65535);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quantize_coordinate(value: f64) -> u16 {
    // Float-to-int `as` saturates and maps NaN to 0
    (value * f64::from(u16::MAX))
        .round_ties_even()
        .clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Divides rounding to nearest, ties to even.
fn rounded_div(numerator: u32, denominator: u32) -> u32 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    match remainder.cmp(&(denominator - remainder)) {
        Ordering::Less => quotient,
        Ordering::Greater => quotient + 1,
        Ordering::Equal => quotient + (quotient & 1),
    }
}

/// Splits a 16-bit value into the `(DTR0, DTR1)` pair, LSB first.
#[must_use]
pub const fn split_dtr(value: u16) -> (u8, u8) {
    let [lsb, msb] = value.to_le_bytes();
    (lsb, msb)
}

/// A DT8 primary colour channel name, normalized to lowercase.
///
/// Channels are looked up by name in the opcode table, so any channel the
/// gateway configuration defines (for example `a` for amber) is accepted.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "String")]
pub struct ColorChannel(String);

impl ColorChannel {
    /// Red.
    #[must_use]
    pub fn red() -> Self {
        Self::new("r")
    }

    /// Green.
    #[must_use]
    pub fn green() -> Self {
        Self::new("g")
    }

    /// Blue.
    #[must_use]
    pub fn blue() -> Self {
        Self::new("b")
    }

    /// White.
    #[must_use]
    pub fn white() -> Self {
        Self::new("w")
    }

    /// Creates a channel from its name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_ascii_lowercase())
    }

    /// Returns the normalized channel name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorChannel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ColorChannel {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

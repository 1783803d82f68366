// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Values actually sent by the DT8 colour operations.
//!
//! Colour requests are clamped and quantized before they reach the bus.
//! These types report what was sent, not what was asked for.

use std::fmt;

use serde::Serialize;

use crate::types::ColorChannel;

/// Result of a colour temperature operation.
///
/// # Examples
///
/// ```
/// use dali_host::response::ColorTemperatureSetting;
///
/// let setting = ColorTemperatureSetting { kelvin: 4000, mirek: 250 };
/// assert_eq!(setting.to_string(), "4000 K (250 mirek)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorTemperatureSetting {
    /// Colour temperature in Kelvin.
    pub kelvin: u32,
    /// The mirek value sent on the bus.
    pub mirek: u16,
}

impl fmt::Display for ColorTemperatureSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} K ({} mirek)", self.kelvin, self.mirek)
    }
}

/// Result of a chromaticity operation.
///
/// `x` and `y` are the coordinates the bus values represent, so a request
/// outside 0.0-1.0 reports the clamped coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChromaticitySetting {
    /// CIE 1931 x coordinate.
    pub x: f64,
    /// CIE 1931 y coordinate.
    pub y: f64,
    /// 16-bit x value sent on the bus.
    pub x_u16: u16,
    /// 16-bit y value sent on the bus.
    pub y_u16: u16,
}

impl ChromaticitySetting {
    pub(crate) fn from_raw(x_u16: u16, y_u16: u16) -> Self {
        let scale = f64::from(u16::MAX);
        Self {
            x: f64::from(x_u16) / scale,
            y: f64::from(y_u16) / scale,
            x_u16,
            y_u16,
        }
    }
}

impl fmt::Display for ChromaticitySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={:.4} y={:.4}", self.x, self.y)
    }
}

/// Result of a primary channel operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PrimarySetting {
    /// Channel name, normalized to lowercase.
    pub channel: ColorChannel,
    /// Level sent on the bus (0-254).
    pub level: u8,
}

impl fmt::Display for PrimarySetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.channel, self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chromaticity_reports_quantized_coordinates() {
        let setting = ChromaticitySetting::from_raw(65535, 0);
        assert!((setting.x - 1.0).abs() < f64::EPSILON);
        assert!(setting.y.abs() < f64::EPSILON);
        assert_eq!(setting.to_string(), "x=1.0000 y=0.0000");
    }

    #[test]
    fn primary_display() {
        let setting = PrimarySetting {
            channel: ColorChannel::red(),
            level: 200,
        };
        assert_eq!(setting.to_string(), "r=200");
    }
}

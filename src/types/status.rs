// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control gear status byte (answer to `QUERY STATUS`).

use std::fmt;

const GEAR_FAILURE: u8 = 0x01;
const LAMP_FAILURE: u8 = 0x02;
const LAMP_ON: u8 = 0x04;
const LIMIT_ERROR: u8 = 0x08;
const FADE_RUNNING: u8 = 0x10;
const RESET_STATE: u8 = 0x20;
const NO_ADDRESS: u8 = 0x40;
const POWER_CYCLE: u8 = 0x80;

/// Decoded control gear status.
///
/// The status query answer is opaque to the controller; this type is a
/// convenience for callers that know they are talking to standard gear.
///
/// ```
/// use dali_host::types::GearStatus;
///
/// let status = GearStatus::new(0x24);
/// assert!(status.lamp_on());
/// assert!(status.reset_state());
/// assert_eq!(status.to_string(), "lamp on, reset state");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GearStatus(u8);

impl GearStatus {
    /// Wraps a raw status byte.
    #[must_use]
    pub const fn new(status: u8) -> Self {
        Self(status)
    }

    /// Decodes the first byte of a query answer, if there is one.
    #[must_use]
    pub fn from_response(response: &[u8]) -> Option<Self> {
        response.first().copied().map(Self)
    }

    /// Returns the raw status byte.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Control gear failure.
    #[must_use]
    pub const fn gear_failure(&self) -> bool {
        self.0 & GEAR_FAILURE != 0
    }

    /// Lamp failure.
    #[must_use]
    pub const fn lamp_failure(&self) -> bool {
        self.0 & LAMP_FAILURE != 0
    }

    /// Lamp arc power is on.
    #[must_use]
    pub const fn lamp_on(&self) -> bool {
        self.0 & LAMP_ON != 0
    }

    /// Last requested level was outside min/max.
    #[must_use]
    pub const fn limit_error(&self) -> bool {
        self.0 & LIMIT_ERROR != 0
    }

    /// A fade is in progress.
    #[must_use]
    pub const fn fade_running(&self) -> bool {
        self.0 & FADE_RUNNING != 0
    }

    /// Gear is in reset state.
    #[must_use]
    pub const fn reset_state(&self) -> bool {
        self.0 & RESET_STATE != 0
    }

    /// Gear has no short address.
    #[must_use]
    pub const fn missing_short_address(&self) -> bool {
        self.0 & NO_ADDRESS != 0
    }

    /// Power cycle seen since last reset.
    #[must_use]
    pub const fn power_cycle(&self) -> bool {
        self.0 & POWER_CYCLE != 0
    }
}

impl fmt::Display for GearStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (GEAR_FAILURE, "gear failure"),
            (LAMP_FAILURE, "lamp failure"),
            (LAMP_ON, "lamp on"),
            (LIMIT_ERROR, "limit error"),
            (FADE_RUNNING, "fade running"),
            (RESET_STATE, "reset state"),
            (NO_ADDRESS, "no address"),
            (POWER_CYCLE, "power cycle"),
        ];
        let names: Vec<&str> = flags
            .iter()
            .filter(|(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            f.write_str("ok")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}

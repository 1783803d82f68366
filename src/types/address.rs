// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DALI addressing.
//!
//! The first byte of every forward frame selects the receivers and tells
//! them whether the second byte is a direct arc power level or a command:
//!
//! | Target               | Layout      | Level | Command |
//! |----------------------|-------------|-------|---------|
//! | Short address 0..=63 | `0AAA AAAS` | `A<<1`| `A<<1 \| 1` |
//! | Group 0..=15         | `100A AAAS` | `0x80 \| A<<1` | `0x81 \| A<<1` |
//! | Broadcast            | `1111 111S` | `0xFE`| `0xFF` |
//! | Unaddressed broadcast| `1111 110S` | `0xFC`| `0xFD` |
//!
//! Short and group numbers are range-checked at construction and never
//! clamped.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValueError};

/// Highest valid short address.
pub const MAX_SHORT_ADDRESS: u8 = 63;

/// Highest valid group number.
pub const MAX_GROUP: u8 = 15;

const SELECTOR_BIT: u8 = 0x01;
const GROUP_BIT: u8 = 0x80;
const BROADCAST_BASE: u8 = 0x7F;
const UNADDRESSED_BASE: u8 = 0x7E;

fn selector(is_command: bool) -> u8 {
    if is_command { SELECTOR_BIT } else { 0 }
}

/// Encodes a short address byte (`0AAA AAAS`).
///
/// # Errors
///
/// Returns `ValueError::OutOfRange` if `value` exceeds 63.
///
/// # Examples
///
/// ```
/// use dali_host::types::addr_short;
///
/// assert_eq!(addr_short(5, false).unwrap(), 0x0A);
/// assert_eq!(addr_short(5, true).unwrap(), 0x0B);
/// assert!(addr_short(64, false).is_err());
/// ```
pub fn addr_short(value: u8, is_command: bool) -> Result<u8, ValueError> {
    let short = ShortAddress::new(value)?;
    Ok((short.value() << 1) | selector(is_command))
}

/// Encodes a group address byte (`100A AAAS`).
///
/// # Errors
///
/// Returns `ValueError::OutOfRange` if `value` exceeds 15.
///
/// # Examples
///
/// ```
/// use dali_host::types::addr_group;
///
/// assert_eq!(addr_group(3, true).unwrap(), 0b1000_0111);
/// assert!(addr_group(16, true).is_err());
/// ```
pub fn addr_group(value: u8, is_command: bool) -> Result<u8, ValueError> {
    let group = GroupAddress::new(value)?;
    Ok(GROUP_BIT | (group.value() << 1) | selector(is_command))
}

/// Encodes a broadcast address byte.
///
/// ```
/// use dali_host::types::addr_broadcast;
///
/// assert_eq!(addr_broadcast(false, false), 0xFE);
/// assert_eq!(addr_broadcast(true, false), 0xFF);
/// assert_eq!(addr_broadcast(false, true), 0xFC);
/// assert_eq!(addr_broadcast(true, true), 0xFD);
/// ```
#[must_use]
pub fn addr_broadcast(is_command: bool, unaddressed: bool) -> u8 {
    let base = if unaddressed {
        UNADDRESSED_BASE
    } else {
        BROADCAST_BASE
    };
    (base << 1) | selector(is_command)
}

/// A validated short address (0-63).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortAddress(u8);

impl ShortAddress {
    /// Creates a short address.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `value` exceeds 63.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > MAX_SHORT_ADDRESS {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(MAX_SHORT_ADDRESS),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the address number.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ShortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

impl TryFrom<u8> for ShortAddress {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A validated group number (0-15).
///
/// Used both for group addressing and for the group argument of
/// membership commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupAddress(u8);

impl GroupAddress {
    /// Creates a group number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `value` exceeds 15.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > MAX_GROUP {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(MAX_GROUP),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the group number.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for GroupAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl TryFrom<u8> for GroupAddress {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A resolved bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// All devices, or only those without a short address.
    Broadcast {
        /// Restrict to devices that have no short address.
        unaddressed: bool,
    },
    /// One device.
    Short(ShortAddress),
    /// All members of a group.
    Group(GroupAddress),
}

impl Address {
    /// Returns the address byte for a level (`false`) or command (`true`) frame.
    #[must_use]
    pub fn to_byte(&self, is_command: bool) -> u8 {
        match self {
            Self::Broadcast { unaddressed } => addr_broadcast(is_command, *unaddressed),
            Self::Short(short) => (short.value() << 1) | selector(is_command),
            Self::Group(group) => GROUP_BIT | (group.value() << 1) | selector(is_command),
        }
    }
}

impl From<ShortAddress> for Address {
    fn from(short: ShortAddress) -> Self {
        Self::Short(short)
    }
}

impl From<GroupAddress> for Address {
    fn from(group: GroupAddress) -> Self {
        Self::Group(group)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broadcast { unaddressed: false } => f.write_str("broadcast"),
            Self::Broadcast { unaddressed: true } => f.write_str("broadcast (unaddressed)"),
            Self::Short(short) => write!(f, "{short}"),
            Self::Group(group) => write!(f, "{group}"),
        }
    }
}

/// How a [`Target`] selects devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Every device on the bus.
    Broadcast,
    /// A single short address.
    Short,
    /// A group address.
    Group,
}

impl AddressMode {
    /// Returns the lowercase mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::Short => "short",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for AddressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broadcast" => Ok(Self::Broadcast),
            "short" => Ok(Self::Short),
            "group" => Ok(Self::Group),
            other => Err(Error::InvalidTarget(format!("unknown address mode {other:?}"))),
        }
    }
}

/// The caller-side description of who a command is for.
///
/// A target is the `(mode, value, unaddressed)` triple coming from a UI or
/// script. It is only turned into an [`Address`] when a command is issued,
/// so a malformed target fails before anything reaches the bus.
///
/// # Examples
///
/// ```
/// use dali_host::types::{Address, Target};
///
/// let target = Target::short(12);
/// assert_eq!(target.resolve().unwrap().to_byte(true), 0x19);
///
/// let target = Target::parse("group", Some(2), false).unwrap();
/// assert_eq!(target.resolve().unwrap().to_byte(false), 0x84);
///
/// // A short target without an address is rejected
/// assert!(Target::parse("short", None, false).unwrap().resolve().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    mode: AddressMode,
    value: Option<u8>,
    unaddressed: bool,
}

impl Target {
    /// Creates a target from its parts.
    #[must_use]
    pub const fn new(mode: AddressMode, value: Option<u8>, unaddressed: bool) -> Self {
        Self {
            mode,
            value,
            unaddressed,
        }
    }

    /// Broadcast to every device.
    #[must_use]
    pub const fn broadcast() -> Self {
        Self::new(AddressMode::Broadcast, None, false)
    }

    /// Broadcast to devices without a short address.
    #[must_use]
    pub const fn unaddressed() -> Self {
        Self::new(AddressMode::Broadcast, None, true)
    }

    /// A single short address.
    #[must_use]
    pub const fn short(value: u8) -> Self {
        Self::new(AddressMode::Short, Some(value), false)
    }

    /// A group address.
    #[must_use]
    pub const fn group(value: u8) -> Self {
        Self::new(AddressMode::Group, Some(value), false)
    }

    /// Builds a target from a mode name.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTarget` if the mode name is unknown.
    pub fn parse(mode: &str, value: Option<u8>, unaddressed: bool) -> Result<Self, Error> {
        Ok(Self::new(mode.parse()?, value, unaddressed))
    }

    /// Returns the addressing mode.
    #[must_use]
    pub const fn mode(&self) -> AddressMode {
        self.mode
    }

    /// Returns the address value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<u8> {
        self.value
    }

    /// Resolves the target into a bus address.
    ///
    /// The `unaddressed` flag only applies to broadcasts.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTarget` if a short or group target has no
    /// value, or `Error::Value` if the value is out of range.
    pub fn resolve(&self) -> Result<Address, Error> {
        match self.mode {
            AddressMode::Broadcast => Ok(Address::Broadcast {
                unaddressed: self.unaddressed,
            }),
            AddressMode::Short => {
                let value = self.require_value()?;
                Ok(Address::Short(ShortAddress::new(value)?))
            }
            AddressMode::Group => {
                let value = self.require_value()?;
                Ok(Address::Group(GroupAddress::new(value)?))
            }
        }
    }

    fn require_value(&self) -> Result<u8, Error> {
        self.value.ok_or_else(|| {
            Error::InvalidTarget(format!("{} target requires an address value", self.mode))
        })
    }
}

impl From<Address> for Target {
    fn from(address: Address) -> Self {
        match address {
            Address::Broadcast { unaddressed } => {
                Self::new(AddressMode::Broadcast, None, unaddressed)
            }
            Address::Short(short) => Self::short(short.value()),
            Address::Group(group) => Self::group(group.value()),
        }
    }
}

impl From<ShortAddress> for Target {
    fn from(short: ShortAddress) -> Self {
        Self::short(short.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_address_encoding() {
        for v in 0..=MAX_SHORT_ADDRESS {
            assert_eq!(addr_short(v, false).unwrap(), v << 1);
            assert_eq!(addr_short(v, true).unwrap(), (v << 1) | 1);
        }
    }

    #[test]
    fn short_address_out_of_range() {
        for v in [64, 100, 255] {
            assert_eq!(
                addr_short(v, false),
                Err(ValueError::OutOfRange {
                    min: 0,
                    max: 63,
                    actual: u16::from(v),
                })
            );
            assert!(addr_short(v, true).is_err());
        }
    }

    #[test]
    fn group_address_encoding() {
        assert_eq!(addr_group(3, true).unwrap(), 0b1000_0111);
        assert_eq!(addr_group(0, false).unwrap(), 0x80);
        assert_eq!(addr_group(15, true).unwrap(), 0x9F);
        assert!(addr_group(16, false).is_err());
    }

    #[test]
    fn broadcast_encoding() {
        assert_eq!(addr_broadcast(false, false), 0xFE);
        assert_eq!(addr_broadcast(true, false), 0xFF);
        assert_eq!(addr_broadcast(false, true), 0xFC);
        assert_eq!(addr_broadcast(true, true), 0xFD);
    }

    #[test]
    fn address_to_byte_matches_codec() {
        let short = Address::Short(ShortAddress::new(7).unwrap());
        assert_eq!(short.to_byte(true), addr_short(7, true).unwrap());
        let group = Address::Group(GroupAddress::new(9).unwrap());
        assert_eq!(group.to_byte(false), addr_group(9, false).unwrap());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("Short".parse::<AddressMode>().unwrap(), AddressMode::Short);
        assert_eq!(" group ".parse::<AddressMode>().unwrap(), AddressMode::Group);
        assert!(matches!(
            "multicast".parse::<AddressMode>(),
            Err(Error::InvalidTarget(_))
        ));
    }

    #[test]
    fn target_missing_value() {
        let target = Target::new(AddressMode::Group, None, false);
        assert!(matches!(target.resolve(), Err(Error::InvalidTarget(_))));
    }

    #[test]
    fn target_out_of_range_is_value_error() {
        assert!(matches!(
            Target::short(64).resolve(),
            Err(Error::Value(ValueError::OutOfRange { actual: 64, .. }))
        ));
    }

    #[test]
    fn unaddressed_only_affects_broadcast() {
        let target = Target::new(AddressMode::Short, Some(1), true);
        assert_eq!(target.resolve().unwrap().to_byte(true), 0x03);
        assert_eq!(Target::unaddressed().resolve().unwrap().to_byte(true), 0xFD);
    }

    #[test]
    fn address_display() {
        assert_eq!(Target::short(4).resolve().unwrap().to_string(), "A4");
        assert_eq!(Target::group(2).resolve().unwrap().to_string(), "G2");
        assert_eq!(Target::broadcast().resolve().unwrap().to_string(), "broadcast");
    }
}

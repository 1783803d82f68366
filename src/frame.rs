// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DALI forward frames.
//!
//! A forward frame is the unit sent on the bus: one address byte followed by
//! one data byte (an arc power level or an opcode). No length prefix or
//! checksum is added here.
//!
//! The module also parses frame lists written as hex pairs, the format used
//! by scripts and automation feeding [`Controller::send_sequence`].
//!
//! [`Controller::send_sequence`]: crate::Controller::send_sequence

use std::fmt;

use crate::error::ParseError;

/// A 2-byte DALI forward frame `[address, data]`.
///
/// # Examples
///
/// ```
/// use dali_host::frame::{Frame, make_forward_frame};
///
/// let frame = make_forward_frame(0x112, 0x234);
/// assert_eq!(frame.as_bytes(), &[0x12, 0x34]);
/// assert_eq!(frame.to_string(), "12 34");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; 2]);

impl Frame {
    /// Creates a frame from an address byte and a data byte.
    #[must_use]
    pub const fn new(address: u8, data: u8) -> Self {
        Self([address, data])
    }

    /// Returns the address byte.
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.0[0]
    }

    /// Returns the data byte.
    #[must_use]
    pub const fn data(&self) -> u8 {
        self.0[1]
    }

    /// Returns the wire bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl From<[u8; 2]> for Frame {
    fn from(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }
}

impl From<(u8, u8)> for Frame {
    fn from((address, data): (u8, u8)) -> Self {
        Self::new(address, data)
    }
}

impl From<(u32, u32)> for Frame {
    fn from((address, data): (u32, u32)) -> Self {
        make_forward_frame(address, data)
    }
}

impl From<Frame> for [u8; 2] {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.0[0], self.0[1])
    }
}

/// Builds a forward frame, keeping only the low 8 bits of each input.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn make_forward_frame(address_byte: u32, data_byte: u32) -> Frame {
    Frame::new((address_byte & 0xFF) as u8, (data_byte & 0xFF) as u8)
}

/// Parses a list of frames written as hex byte pairs.
///
/// Frames are separated by `;` or newlines; the two bytes of a frame by
/// whitespace, `,` or `|`. Bytes are one or two hex digits with an optional
/// `0x` prefix.
///
/// # Errors
///
/// Returns `ParseError` if a token is not a hex byte, a frame does not have
/// exactly two bytes, or the input holds no frames.
///
/// # Examples
///
/// ```
/// use dali_host::frame::{Frame, parse_frames};
///
/// let frames = parse_frames("FF 21; c1,08\n0xA3 | 7f").unwrap();
/// assert_eq!(
///     frames,
///     vec![Frame::new(0xFF, 0x21), Frame::new(0xC1, 0x08), Frame::new(0xA3, 0x7F)]
/// );
/// assert!(parse_frames("FF").is_err());
/// ```
pub fn parse_frames(text: &str) -> Result<Vec<Frame>, ParseError> {
    let mut frames = Vec::new();
    for chunk in text.split([';', '\n']) {
        let tokens: Vec<&str> = chunk
            .split(|c: char| c.is_whitespace() || c == ',' || c == '|')
            .filter(|t| !t.is_empty())
            .collect();
        match tokens.as_slice() {
            [] => {}
            [address, data] => frames.push(Frame::new(parse_byte(address)?, parse_byte(data)?)),
            other => {
                return Err(ParseError::FrameLength(
                    other.iter().map(ToString::to_string).collect(),
                ));
            }
        }
    }
    if frames.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(frames)
}

/// Formats frames as `"AA DD; AA DD"`.
#[must_use]
pub fn format_frames(frames: &[Frame]) -> String {
    frames
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn parse_byte(token: &str) -> Result<u8, ParseError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() || digits.len() > 2 {
        return Err(ParseError::InvalidByte(token.to_string()));
    }
    u8::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidByte(token.to_string()))
}

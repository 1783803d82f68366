// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `dali_host` library.
//!
//! Errors are split by layer so callers can tell a rejected command
//! (nothing was sent) from a transport failure (something may have been
//! sent). A missing reply is not an error: queries return `None` instead.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A numeric identifier or value is outside its domain.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The addressing mode is unknown or lacks a required address value.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The DT8 primary colour channel has no opcode in the table.
    #[error("unknown primary colour channel: {0}")]
    UnknownChannel(String),

    /// The transport failed while talking to the gateway.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The controller configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A textual frame list could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },
}

/// Errors raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// A frame was sent on a transport that is not connected.
    #[error("transport is not connected")]
    NotConnected,

    /// The transport is a placeholder without an implementation.
    #[error("{0} transport is not implemented")]
    NotImplemented(&'static str),

    /// Connecting to the gateway failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connecting to the gateway did not complete in time.
    #[error("connection timed out after {0} ms")]
    ConnectTimeout(u64),

    /// An I/O error on an established connection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to controller configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The colour temperature range is empty or starts at zero.
    #[error("invalid colour temperature range [{min}, {max}] K")]
    InvalidTcRange {
        /// Configured lower bound in Kelvin.
        min: u32,
        /// Configured upper bound in Kelvin.
        max: u32,
    },

    /// A USB vendor or product id could not be parsed.
    #[error("invalid USB id: {0}")]
    InvalidUsbId(String),

    /// The gateway type requires a feature that was not compiled in.
    #[error("gateway type {0} is not available in this build")]
    UnsupportedGateway(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to parsing hex frame lists.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token is not a one- or two-digit hex byte.
    #[error("invalid byte: {0:?}")]
    InvalidByte(String),

    /// A frame did not consist of exactly two bytes.
    #[error("frame must have exactly two bytes, got {0:?}")]
    FrameLength(Vec<String>),

    /// The input contained no frames at all.
    #[error("no frames found")]
    Empty,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

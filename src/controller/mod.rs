// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The DALI bus controller.
//!
//! [`Controller`] turns lighting intents into forward frames and sends them
//! over its transport. Every operation validates all of its identifiers
//! before the first frame is sent, so a rejected command never leaves a
//! partial sequence on the bus. Once sending has started, a transport error
//! stops the sequence at the failing frame and is returned as is; nothing
//! is retried.
//!
//! # Examples
//!
//! ```
//! use dali_host::{Controller, Target};
//! use dali_host::transport::MockTransport;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> dali_host::Result<()> {
//! let mock = MockTransport::new();
//! let log = mock.log();
//! let mut controller = Controller::new(mock);
//! controller.connect().await?;
//!
//! controller.send_arc(Target::group(2), 128).await?;
//! controller.scene_recall(Target::broadcast(), 5).await?;
//!
//! let sent: Vec<String> = log.frames().iter().map(ToString::to_string).collect();
//! assert_eq!(sent, vec!["84 80", "FF 45"]);
//! # Ok(())
//! # }
//! ```

mod apply;
mod dt8;
mod query;

use std::time::Duration;

use crate::config::{ControllerConfig, OpcodeTable, TcRange};
use crate::error::Result;
use crate::frame::{Frame, make_forward_frame};
use crate::transport::{Gateway, Transport};
use crate::types::{Address, ArcLevel, GroupAddress, Scene, Target};

/// Default time to wait for a query answer.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(300);

/// A DALI bus controller driving one gateway transport.
///
/// All operations take `&mut self` and complete their whole frame sequence
/// before returning, so sequences from different operations never
/// interleave on the bus.
///
/// # Type Parameter
///
/// `T` is the transport. It defaults to [`Gateway`], the runtime-selected
/// transport built by [`Controller::from_config`].
#[derive(Debug)]
pub struct Controller<T: Transport = Gateway> {
    transport: T,
    ops: OpcodeTable,
    tc: TcRange,
}

impl Controller<Gateway> {
    /// Builds a controller and its transport from configuration.
    ///
    /// The transport is not connected yet.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        config.validate()?;
        let gateway = Gateway::from_config(&config.gateway)?;
        Ok(Self {
            transport: gateway,
            ops: config.ops.clone(),
            tc: config.tc,
        })
    }
}

impl<T: Transport> Controller<T> {
    /// Creates a controller with the default opcode table and colour
    /// temperature range.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            ops: OpcodeTable::default(),
            tc: TcRange::default(),
        }
    }

    /// Creates a controller with an explicit opcode table and colour
    /// temperature range.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the colour temperature range is invalid.
    pub fn with_opcodes(transport: T, ops: OpcodeTable, tc: TcRange) -> Result<Self> {
        tc.validate()?;
        Ok(Self { transport, ops, tc })
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the opcode table.
    #[must_use]
    pub fn opcodes(&self) -> &OpcodeTable {
        &self.ops
    }

    /// Returns the colour temperature range.
    #[must_use]
    pub fn tc_range(&self) -> TcRange {
        self.tc
    }

    /// Consumes the controller, returning its transport.
    #[must_use]
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Opens the transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the gateway cannot be reached.
    pub async fn connect(&mut self) -> Result<()> {
        self.transport.connect().await?;
        Ok(())
    }

    /// Closes the transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the transport refuses to close.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.transport.disconnect().await?;
        Ok(())
    }

    /// Returns true if the transport is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Sets the direct arc power level of a target.
    ///
    /// Level 255 is clamped to 254.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or sending fails.
    pub async fn send_arc(&mut self, target: Target, level: u8) -> Result<()> {
        let address = target.resolve()?;
        let level = ArcLevel::clamped(level);
        self.send_frames(&[Frame::new(address.to_byte(false), level.value())])
            .await
    }

    /// Sends one command and waits up to `timeout` for an answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or the transport fails.
    /// No answer is `Ok(None)`.
    pub async fn send_command(
        &mut self,
        target: Target,
        opcode: u8,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>> {
        let address = target.resolve()?;
        self.query(address, opcode, timeout).await
    }

    /// Recalls a scene (0-15).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a scene above 15, or a target or transport
    /// error.
    pub async fn scene_recall(&mut self, target: Target, scene: u8) -> Result<()> {
        let address = target.resolve()?;
        let scene = Scene::new(scene)?;
        let frame = command_frame(address, self.ops.recall_scene_base, scene.value());
        self.send_frames(&[frame]).await
    }

    /// Stores `level` as the scene level of the target.
    ///
    /// Four frames are sent: the `write_dtr` command, the level as a direct
    /// arc frame, the `write_dtr` command again and the store command. This
    /// is the sequence expected by the supported gateways rather than the
    /// minimal IEC 62386 one. The scene is masked to its low four bits and
    /// the level clamped to 254.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or sending fails.
    pub async fn scene_store_level(&mut self, target: Target, scene: u8, level: u8) -> Result<()> {
        let address = target.resolve()?;
        let frames =
            self.scene_store_frames(address, Scene::masked(scene), ArcLevel::clamped(level));
        self.send_frames(&frames).await
    }

    /// Removes the target from a scene (0-15).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a scene above 15, or a target or transport
    /// error.
    pub async fn scene_remove(&mut self, target: Target, scene: u8) -> Result<()> {
        let address = target.resolve()?;
        let scene = Scene::new(scene)?;
        let frame = command_frame(address, self.ops.remove_from_scene_base, scene.value());
        self.send_frames(&[frame]).await
    }

    /// Adds the target to a group (0-15).
    ///
    /// Gear accepts configuration commands only when addressed by short
    /// address or broadcast.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a group above 15, or a target or transport
    /// error.
    pub async fn group_add(&mut self, target: Target, group: u8) -> Result<()> {
        let address = target.resolve()?;
        let group = GroupAddress::new(group)?;
        let frame = command_frame(address, self.ops.add_to_group_base, group.value());
        self.send_frames(&[frame]).await
    }

    /// Removes the target from a group (0-15).
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a group above 15, or a target or transport
    /// error.
    pub async fn group_remove(&mut self, target: Target, group: u8) -> Result<()> {
        let address = target.resolve()?;
        let group = GroupAddress::new(group)?;
        let frame = command_frame(address, self.ops.remove_from_group_base, group.value());
        self.send_frames(&[frame]).await
    }

    /// Sends one frame without address encoding. Inputs are masked to
    /// 8 bits.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if sending fails.
    pub async fn send_raw(&mut self, address_byte: u32, data_byte: u32) -> Result<()> {
        self.send_frames(&[make_forward_frame(address_byte, data_byte)])
            .await
    }

    /// Sends frames in order, stopping at the first failure.
    ///
    /// Items may be [`Frame`]s, byte pairs, or `(u32, u32)` pairs, which
    /// are masked to 8 bits like [`send_raw`](Self::send_raw).
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` from the first frame that fails; later
    /// frames are not sent.
    pub async fn send_sequence<I>(&mut self, frames: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Frame>,
    {
        let frames: Vec<Frame> = frames.into_iter().map(Into::into).collect();
        self.send_frames(&frames).await
    }

    fn scene_store_frames(&self, address: Address, scene: Scene, level: ArcLevel) -> [Frame; 4] {
        let cmd = address.to_byte(true);
        [
            Frame::new(cmd, self.ops.write_dtr),
            Frame::new(address.to_byte(false), level.value()),
            Frame::new(cmd, self.ops.write_dtr),
            Frame::new(cmd, self.ops.store_dtr_as_scene_base.wrapping_add(scene.value())),
        ]
    }

    async fn send_frames(&mut self, frames: &[Frame]) -> Result<()> {
        for frame in frames {
            tracing::debug!(frame = %frame, "Sending DALI frame");
            self.transport.send(*frame).await?;
        }
        Ok(())
    }

    async fn query(
        &mut self,
        address: Address,
        opcode: u8,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>> {
        self.send_frames(&[Frame::new(address.to_byte(true), opcode)])
            .await?;
        let response = self.transport.recv(timeout).await?;
        match &response {
            Some(bytes) => tracing::debug!(
                address = %address,
                opcode,
                response = ?bytes,
                "Query answered"
            ),
            None => tracing::debug!(address = %address, opcode, "Query not answered"),
        }
        Ok(response)
    }
}

/// A command frame for `address` carrying `base + offset`.
pub(crate) fn command_frame(address: Address, base: u8, offset: u8) -> Frame {
    Frame::new(address.to_byte(true), base.wrapping_add(offset))
}

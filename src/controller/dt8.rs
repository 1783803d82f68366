// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device Type 8 (colour control) sequences.
//!
//! A DT8 command is prefixed by its parameter in DTR0 (and DTR1 for 16-bit
//! values) and by `ENABLE DEVICE TYPE 8`. The gear only accepts the final
//! command if it immediately follows the enable frame.

use super::Controller;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::response::{ChromaticitySetting, ColorTemperatureSetting, PrimarySetting};
use crate::transport::Transport;
use crate::types::{
    Address, ArcLevel, ColorChannel, Target, clamp_mirek, kelvin_from_mirek, mirek_from_kelvin,
    quantize_coordinate, split_dtr,
};

/// Device type number of colour control gear.
const DEVICE_TYPE_COLOUR: u8 = 8;

impl<T: Transport> Controller<T> {
    /// Sets the colour temperature in Kelvin.
    ///
    /// The request is clamped to the configured range and converted to
    /// mirek.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or sending fails.
    pub async fn dt8_set_tc_kelvin(
        &mut self,
        target: Target,
        kelvin: u32,
    ) -> Result<ColorTemperatureSetting> {
        let address = target.resolve()?;
        let kelvin = self.tc.clamp(kelvin);
        let mirek = mirek_from_kelvin(kelvin);
        let frames = self.dtr16_sequence(address, mirek, self.ops.dt8_set_tc_opcode);
        self.send_frames(&frames).await?;
        tracing::debug!(address = %address, kelvin, mirek, "Set colour temperature");
        Ok(ColorTemperatureSetting { kelvin, mirek })
    }

    /// Sets the colour temperature in mirek.
    ///
    /// The request is clamped to 1-65534. The configured Kelvin range does
    /// not apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or sending fails.
    pub async fn dt8_set_tc_mirek(
        &mut self,
        target: Target,
        mirek: u32,
    ) -> Result<ColorTemperatureSetting> {
        let address = target.resolve()?;
        let mirek = clamp_mirek(mirek);
        let frames = self.dtr16_sequence(address, mirek, self.ops.dt8_set_tc_opcode);
        self.send_frames(&frames).await?;
        let kelvin = kelvin_from_mirek(mirek);
        tracing::debug!(address = %address, kelvin, mirek, "Set colour temperature");
        Ok(ColorTemperatureSetting { kelvin, mirek })
    }

    /// Sets the CIE 1931 chromaticity.
    ///
    /// Each coordinate is scaled to 16 bits, rounded and clamped. The x
    /// sequence is sent first, then the y sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or sending fails.
    pub async fn dt8_set_xy(
        &mut self,
        target: Target,
        x: f64,
        y: f64,
    ) -> Result<ChromaticitySetting> {
        let address = target.resolve()?;
        let x_u16 = quantize_coordinate(x);
        let y_u16 = quantize_coordinate(y);
        let mut frames = Vec::with_capacity(8);
        frames.extend(self.dtr16_sequence(address, x_u16, self.ops.dt8_set_x_opcode));
        frames.extend(self.dtr16_sequence(address, y_u16, self.ops.dt8_set_y_opcode));
        self.send_frames(&frames).await?;
        let setting = ChromaticitySetting::from_raw(x_u16, y_u16);
        tracing::debug!(address = %address, x_u16, y_u16, "Set chromaticity");
        Ok(setting)
    }

    /// Sets the level of one primary channel.
    ///
    /// The channel is looked up in the opcode table by name, ignoring case.
    /// The level is clamped to 254.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownChannel` if the table has no opcode for the
    /// channel, or a target or transport error.
    pub async fn dt8_set_primary(
        &mut self,
        target: Target,
        channel: impl Into<ColorChannel>,
        level: u8,
    ) -> Result<PrimarySetting> {
        let address = target.resolve()?;
        let channel = channel.into();
        let (frames, setting) = self.primary_sequence(address, channel, level)?;
        self.send_frames(&frames).await?;
        tracing::debug!(address = %address, setting = %setting, "Set primary level");
        Ok(setting)
    }

    /// Sets red, green, blue and white, in that order.
    ///
    /// All four channels are looked up before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownChannel` if any channel is missing from the
    /// opcode table, or a target or transport error.
    pub async fn dt8_set_rgbw(
        &mut self,
        target: Target,
        r: u8,
        g: u8,
        b: u8,
        w: u8,
    ) -> Result<[PrimarySetting; 4]> {
        let address = target.resolve()?;
        let (red, red_setting) = self.primary_sequence(address, ColorChannel::red(), r)?;
        let (green, green_setting) = self.primary_sequence(address, ColorChannel::green(), g)?;
        let (blue, blue_setting) = self.primary_sequence(address, ColorChannel::blue(), b)?;
        let (white, white_setting) = self.primary_sequence(address, ColorChannel::white(), w)?;

        let frames: Vec<Frame> = [red, green, blue, white].into_iter().flatten().collect();
        self.send_frames(&frames).await?;
        tracing::debug!(address = %address, r, g, b, w, "Set RGBW levels");
        Ok([red_setting, green_setting, blue_setting, white_setting])
    }

    /// DTR0, DTR1, enable DT8, then `opcode` to the target.
    fn dtr16_sequence(&self, address: Address, value: u16, opcode: u8) -> [Frame; 4] {
        let (lsb, msb) = split_dtr(value);
        [
            Frame::new(self.ops.write_dtr0_addr, lsb),
            Frame::new(self.ops.write_dtr1_addr, msb),
            Frame::new(self.ops.dt8_enable_addr, DEVICE_TYPE_COLOUR),
            Frame::new(address.to_byte(true), opcode),
        ]
    }

    fn primary_sequence(
        &self,
        address: Address,
        channel: ColorChannel,
        level: u8,
    ) -> Result<([Frame; 3], PrimarySetting)> {
        let opcode = self
            .ops
            .primary_opcode(&channel)
            .ok_or_else(|| Error::UnknownChannel(channel.to_string()))?;
        let level = ArcLevel::clamped(level).value();
        let frames = [
            Frame::new(self.ops.write_dtr0_addr, level),
            Frame::new(self.ops.dt8_enable_addr, DEVICE_TYPE_COLOUR),
            Frame::new(address.to_byte(true), opcode),
        ];
        Ok((frames, PrimarySetting { channel, level }))
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulk application of group plans, scene plans and presets.

use super::{Controller, command_frame};
use crate::error::Result;
use crate::frame::Frame;
use crate::preset::{Preset, PresetKind, PresetOutcome};
use crate::state::{GroupEntry, SceneEntry};
use crate::transport::Transport;
use crate::types::{Address, ArcLevel, MAX_GROUP, Target};

impl<T: Transport> Controller<T> {
    /// Applies group memberships.
    ///
    /// Each listed group is added. With `clear_others`, every other group
    /// of the device is removed as well, so each entry sends exactly 16
    /// frames. Every entry is validated before the first frame is sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a bad short address or group, or a
    /// transport error.
    pub async fn apply_groups(
        &mut self,
        entries: &[GroupEntry],
        clear_others: bool,
    ) -> Result<()> {
        let mut frames = Vec::new();
        for entry in entries {
            let (short, groups) = entry.validate()?;
            let address = Address::Short(short);
            if clear_others {
                for group in 0..=MAX_GROUP {
                    let base = if groups.iter().any(|g| g.value() == group) {
                        self.ops.add_to_group_base
                    } else {
                        self.ops.remove_from_group_base
                    };
                    frames.push(command_frame(address, base, group));
                }
            } else {
                frames.extend(
                    groups
                        .iter()
                        .map(|g| command_frame(address, self.ops.add_to_group_base, g.value())),
                );
            }
        }
        tracing::debug!(entries = entries.len(), frames = frames.len(), "Applying groups");
        self.send_frames(&frames).await
    }

    /// Stores scene levels, in ascending scene order per device.
    ///
    /// With `recall_after_store`, each stored scene is recalled right away.
    /// Every entry is validated before the first frame is sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a bad short address, scene or level, or a
    /// transport error.
    pub async fn apply_scenes(
        &mut self,
        entries: &[SceneEntry],
        recall_after_store: bool,
    ) -> Result<()> {
        let mut frames: Vec<Frame> = Vec::new();
        for entry in entries {
            let (short, levels) = entry.validate()?;
            let address = Address::Short(short);
            for (scene, level) in levels {
                frames.extend(self.scene_store_frames(address, scene, ArcLevel::clamped(level)));
                if recall_after_store {
                    frames.push(command_frame(
                        address,
                        self.ops.recall_scene_base,
                        scene.value(),
                    ));
                }
            }
        }
        tracing::debug!(entries = entries.len(), frames = frames.len(), "Applying scenes");
        self.send_frames(&frames).await
    }

    /// Applies a colour preset to a target.
    ///
    /// # Errors
    ///
    /// Returns the errors of the underlying DT8 operation.
    pub async fn apply_preset(
        &mut self,
        target: Target,
        preset: &Preset,
    ) -> Result<PresetOutcome> {
        tracing::debug!(preset = %preset.name, "Applying preset");
        match preset.kind {
            PresetKind::Rgbw { values } => self
                .dt8_set_rgbw(target, values.r, values.g, values.b, values.w)
                .await
                .map(PresetOutcome::Rgbw),
            PresetKind::Tc { kelvin } => self
                .dt8_set_tc_kelvin(target, kelvin)
                .await
                .map(PresetOutcome::Tc),
            PresetKind::Xy { values } => self
                .dt8_set_xy(target, values.x, values.y)
                .await
                .map(PresetOutcome::Xy),
        }
    }
}

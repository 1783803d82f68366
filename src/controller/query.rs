// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Queries and bus scanning.
//!
//! Queries go to a single short address. A missing answer is not an error:
//! DALI gear answers "no" to yes/no queries by staying silent.

use std::time::Duration;

use super::Controller;
use crate::error::Result;
use crate::response::{GroupMembership, SceneLevels};
use crate::transport::Transport;
use crate::types::{Address, GearStatus, Scene, ShortAddress};

impl<T: Transport> Controller<T> {
    /// Sends `QUERY STATUS` to a device and returns the raw answer.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a short address above 63, or a transport
    /// error.
    pub async fn query_status(&mut self, short: u8, timeout: Duration) -> Result<Option<Vec<u8>>> {
        let address = Address::Short(ShortAddress::new(short)?);
        self.query(address, self.ops.query_status, timeout).await
    }

    /// Sends `QUERY STATUS` and decodes the answer.
    ///
    /// # Errors
    ///
    /// Same as [`query_status`](Self::query_status).
    pub async fn query_gear_status(
        &mut self,
        short: u8,
        timeout: Duration,
    ) -> Result<Option<GearStatus>> {
        let response = self.query_status(short, timeout).await?;
        Ok(response.as_deref().and_then(GearStatus::from_response))
    }

    /// Reads the group membership of a device.
    ///
    /// Two queries are sent, one per half of the group range. A half that
    /// gets no answer reads as no membership.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a short address above 63, or a transport
    /// error.
    pub async fn query_groups(&mut self, short: u8, timeout: Duration) -> Result<GroupMembership> {
        let address = Address::Short(ShortAddress::new(short)?);
        let low = self
            .query(address, self.ops.query_groups_0_7, timeout)
            .await?;
        let high = self
            .query(address, self.ops.query_groups_8_15, timeout)
            .await?;
        Ok(GroupMembership::from_responses(
            first_byte(low.as_deref()),
            first_byte(high.as_deref()),
        ))
    }

    /// Reads the stored level of every scene of a device.
    ///
    /// Sixteen queries are sent in scene order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a short address above 63, or a transport
    /// error.
    pub async fn query_scene_levels(
        &mut self,
        short: u8,
        timeout: Duration,
    ) -> Result<SceneLevels> {
        let address = Address::Short(ShortAddress::new(short)?);
        let mut levels = [None; 16];
        for scene in Scene::all() {
            let opcode = self.ops.query_scene_level_base.wrapping_add(scene.value());
            let response = self.query(address, opcode, timeout).await?;
            levels[usize::from(scene.value())] = first_byte(response.as_deref());
        }
        Ok(SceneLevels::new(levels))
    }

    /// Finds the devices that answer `QUERY STATUS`.
    ///
    /// Addresses are queried one at a time in the order given. A transport
    /// failure on one address is logged and counts as no device; the scan
    /// goes on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if any address is above 63. Nothing is sent
    /// in that case.
    pub async fn scan_devices<I>(&mut self, addresses: I, timeout: Duration) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = u8>,
    {
        let addresses = addresses
            .into_iter()
            .map(ShortAddress::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut found = Vec::new();
        for short in addresses {
            match self
                .query(Address::Short(short), self.ops.query_status, timeout)
                .await
            {
                Ok(Some(response)) if !response.is_empty() => found.push(short.value()),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(address = %short, error = %e, "Scan query failed");
                }
            }
        }
        tracing::info!(found = found.len(), "Bus scan complete");
        Ok(found)
    }
}

fn first_byte(response: Option<&[u8]>) -> Option<u8> {
    response.and_then(|bytes| bytes.first().copied())
}

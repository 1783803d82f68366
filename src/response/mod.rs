// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Results returned by controller operations.
//!
//! Setting types report the values that were actually sent after clamping
//! and quantization. Query types decode raw backward frames.

mod color;
mod query;

pub use color::{ChromaticitySetting, ColorTemperatureSetting, PrimarySetting};
pub use query::{GroupMembership, SceneLevels};

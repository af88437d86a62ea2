// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.

use serde::{Deserialize, Serialize};

/// A single field update produced by a successful command.
///
/// Poll cycles replace the whole [`ClimateState`](super::ClimateState);
/// commands only know the one value they wrote, so they are mirrored as a
/// `StateChange` applied on top of the last published state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateChange {
    /// Power switched on or off.
    Power(bool),
    /// Operating mode changed.
    OperatingMode(String),
    /// Target temperature changed.
    TargetTemperature(f64),
    /// Fan speed changed.
    FanSpeed(String),
    /// Vertical vane changed.
    VaneMode(String),
    /// Horizontal vane changed.
    WideVaneMode(String),
    /// External room temperature pushed to the unit.
    RemoteTemperature(f64),
}

impl StateChange {
    /// Returns `true` if this change touches an enumerated control.
    #[must_use]
    pub fn is_enumerated(&self) -> bool {
        matches!(
            self,
            Self::OperatingMode(_) | Self::FanSpeed(_) | Self::VaneMode(_) | Self::WideVaneMode(_)
        )
    }
}

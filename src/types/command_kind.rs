// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Logical names of writable control points.

use std::fmt;

/// A writable control point, independent of any brand's wire spelling.
///
/// The brand's [`FieldMap`](crate::profile::FieldMap) translates each kind
/// into the query parameter the firmware understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Power on/off.
    Power,
    /// Target (set) temperature.
    TargetTemperature,
    /// Operating mode (auto, cool, heat, ...).
    OperatingMode,
    /// Fan speed.
    FanSpeed,
    /// Vertical vane position.
    VaneMode,
    /// Horizontal (wide) vane position.
    WideVaneMode,
    /// Room temperature measured by an external source.
    RemoteTemperature,
}

impl CommandKind {
    /// All command kinds.
    pub const ALL: [Self; 7] = [
        Self::Power,
        Self::TargetTemperature,
        Self::OperatingMode,
        Self::FanSpeed,
        Self::VaneMode,
        Self::WideVaneMode,
        Self::RemoteTemperature,
    ];

    /// Returns the logical name used in field tables.
    #[must_use]
    pub const fn logical_name(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::TargetTemperature => "set_temperature",
            Self::OperatingMode => "operating_mode",
            Self::FanSpeed => "fan_speed",
            Self::VaneMode => "vane_mode",
            Self::WideVaneMode => "wide_vane_mode",
            Self::RemoteTemperature => "remote_temperature",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.logical_name())
    }
}

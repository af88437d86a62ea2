// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Logical-to-wire field name table.

use crate::types::CommandKind;

/// Maps each [`CommandKind`] to the query parameter a brand's firmware expects.
///
/// A `FieldMap` is built once per session and never mutated. The same table is
/// used by the decoder to find the vane fields in a status payload, so that the
/// value read back always comes from the field that was written.
///
/// # Examples
///
/// ```
/// use climactl_lib::profile::FieldMap;
/// use climactl_lib::types::CommandKind;
///
/// let map = FieldMap::LG;
/// assert_eq!(map.field(CommandKind::VaneMode), Some("vane1"));
/// assert_eq!(FieldMap::MITSUBISHI_HEAVY_INDUSTRIES.field(CommandKind::RemoteTemperature), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    power: &'static str,
    set_temperature: &'static str,
    operating_mode: &'static str,
    fan_speed: &'static str,
    vane_mode: &'static str,
    wide_vane_mode: &'static str,
    remote_temperature: Option<&'static str>,
}

impl FieldMap {
    /// Mitsubishi Electric field names.
    pub const MITSUBISHI_ELECTRIC: Self = Self {
        power: "power",
        set_temperature: "set_temperature",
        operating_mode: "mode",
        fan_speed: "fan",
        vane_mode: "vane",
        wide_vane_mode: "widevane",
        remote_temperature: Some("remote_temperature"),
    };

    /// Mitsubishi Heavy Industries field names.
    pub const MITSUBISHI_HEAVY_INDUSTRIES: Self = Self {
        power: "power",
        set_temperature: "set_temperature",
        operating_mode: "mode",
        fan_speed: "fan",
        vane_mode: "vane",
        wide_vane_mode: "vanelr",
        remote_temperature: None,
    };

    /// LG field names.
    pub const LG: Self = Self {
        power: "power",
        set_temperature: "set_temperature",
        operating_mode: "mode",
        fan_speed: "fan",
        vane_mode: "vane1",
        wide_vane_mode: "vane0",
        remote_temperature: Some("remote_temperature"),
    };

    /// Legacy generic controller field names.
    pub const GENERIC_LEGACY: Self = Self {
        power: "power",
        set_temperature: "set_temperature",
        operating_mode: "mode",
        fan_speed: "fan",
        vane_mode: "vane",
        wide_vane_mode: "widevane",
        remote_temperature: None,
    };

    /// Returns the wire field for a command kind, or `None` if the brand has no
    /// such control.
    #[must_use]
    pub const fn field(&self, kind: CommandKind) -> Option<&'static str> {
        match kind {
            CommandKind::Power => Some(self.power),
            CommandKind::TargetTemperature => Some(self.set_temperature),
            CommandKind::OperatingMode => Some(self.operating_mode),
            CommandKind::FanSpeed => Some(self.fan_speed),
            CommandKind::VaneMode => Some(self.vane_mode),
            CommandKind::WideVaneMode => Some(self.wide_vane_mode),
            CommandKind::RemoteTemperature => self.remote_temperature,
        }
    }

    /// Returns `true` if the brand accepts the given command kind.
    #[must_use]
    pub const fn supports(&self, kind: CommandKind) -> bool {
        self.field(kind).is_some()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brand profiles.
//!
//! A [`BrandProfile`] bundles everything that differs between firmware
//! families: the wire field names ([`FieldMap`]), the rule that tells a real
//! 0 °C outside reading apart from the "no reading" sentinel, the unit of the
//! instantaneous power field, the allowed values of each enumerated control
//! and whether a successful command is mirrored locally or followed by a
//! fresh poll.
//!
//! Sessions are parameterized by a profile value; there is no per-brand
//! session type.
//!
//! # Examples
//!
//! ```
//! use climactl_lib::profile::{BrandProfile, InstantPowerSource};
//! use climactl_lib::types::{Brand, CommandKind};
//!
//! let mhi = BrandProfile::for_brand(Brand::MitsubishiHeavyIndustries);
//! assert!(matches!(mhi.instant_power, InstantPowerSource::Amps { .. }));
//! assert!(mhi.validate(CommandKind::FanSpeed, "3").is_ok());
//! assert!(mhi.validate(CommandKind::FanSpeed, "superhigh").is_err());
//! ```

mod field_map;

pub use field_map::FieldMap;

use crate::error::ValueError;
use crate::types::{Brand, CommandKind};

/// Nominal mains voltage used to turn a current reading into Watts.
pub const NOMINAL_VOLTAGE: f64 = 230.0;

/// How a brand encodes "no outside temperature reading".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutsideTemperatureRule {
    /// A raw value of 0 always means absent.
    ZeroIsAbsent,
    /// A raw value of 0 means absent unless the unit reports that it is
    /// operating, in which case 0 is a genuine reading.
    ZeroValidWhileOperating,
}

impl OutsideTemperatureRule {
    /// Applies the rule to a raw reading.
    #[must_use]
    pub fn apply(self, raw: Option<f64>, operating: bool) -> Option<f64> {
        let value = raw?;
        if value != 0.0 {
            return Some(value);
        }
        match self {
            Self::ZeroIsAbsent => None,
            Self::ZeroValidWhileOperating => operating.then_some(value),
        }
    }
}

/// Unit of the instantaneous power field of a status payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstantPowerSource {
    /// The field already holds Watts.
    Watts,
    /// The field holds a current in Amps, converted with a nominal voltage.
    Amps {
        /// Voltage used for the conversion.
        nominal_voltage: f64,
    },
    /// The brand reports no instantaneous power.
    Unsupported,
}

impl InstantPowerSource {
    /// Converts a raw reading into Watts.
    #[must_use]
    pub fn to_watts(self, raw: Option<f64>) -> Option<f64> {
        match self {
            Self::Watts => raw,
            Self::Amps { nominal_voltage } => raw.map(|amps| amps * nominal_voltage),
            Self::Unsupported => None,
        }
    }

    /// Returns `true` if the brand reports instantaneous power at all.
    #[must_use]
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// What a session does after the device accepted a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoPolicy {
    /// Write the new value into the local state right away.
    MirrorLocally,
    /// Run a status cycle right away and publish what the device reports.
    Repoll,
}

/// Allowed values of the enumerated controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumSets {
    /// Operating modes.
    pub operating_modes: &'static [&'static str],
    /// Fan speeds.
    pub fan_speeds: &'static [&'static str],
    /// Vertical vane positions.
    pub vane_modes: &'static [&'static str],
    /// Horizontal vane positions.
    pub wide_vane_modes: &'static [&'static str],
}

const MODES: &[&str] = &["auto", "cool", "dry", "heat", "fan"];

const ME_SETS: EnumSets = EnumSets {
    operating_modes: MODES,
    fan_speeds: &["auto", "silent", "low", "med", "high", "superhigh"],
    vane_modes: &["auto", "swing", "1", "2", "3", "4", "5"],
    wide_vane_modes: &[
        "auto", "swing", "maxleft", "left", "middle", "right", "maxright",
    ],
};

const MHI_SETS: EnumSets = EnumSets {
    operating_modes: MODES,
    fan_speeds: &["auto", "1", "2", "3", "4"],
    vane_modes: &["swing", "1", "2", "3", "4"],
    wide_vane_modes: &["swing", "1", "2", "3", "4", "5", "6", "7"],
};

const LG_SETS: EnumSets = EnumSets {
    operating_modes: MODES,
    fan_speeds: &["auto", "1", "2", "3", "4", "5"],
    vane_modes: &["swing", "1", "2", "3", "4", "5", "6"],
    wide_vane_modes: &["swing", "1", "2", "3", "4", "5", "6"],
};

/// Everything that varies between firmware families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrandProfile {
    /// The brand this profile describes.
    pub brand: Brand,
    /// Wire field names.
    pub field_map: FieldMap,
    /// Outside temperature absence rule.
    pub outside_temperature: OutsideTemperatureRule,
    /// Unit of the instantaneous power field.
    pub instant_power: InstantPowerSource,
    /// Whether the brand reports a cumulative energy counter.
    pub energy_counter: bool,
    /// What to do after a successful command.
    pub echo: EchoPolicy,
    /// Allowed values for enumerated controls.
    pub enums: EnumSets,
    /// Polling interval used when the session configuration sets none.
    pub default_polling_interval_minutes: u32,
}

impl BrandProfile {
    /// Mitsubishi Electric profile.
    pub const MITSUBISHI_ELECTRIC: Self = Self {
        brand: Brand::MitsubishiElectric,
        field_map: FieldMap::MITSUBISHI_ELECTRIC,
        outside_temperature: OutsideTemperatureRule::ZeroValidWhileOperating,
        instant_power: InstantPowerSource::Watts,
        energy_counter: true,
        echo: EchoPolicy::MirrorLocally,
        enums: ME_SETS,
        default_polling_interval_minutes: 1,
    };

    /// Mitsubishi Heavy Industries profile.
    pub const MITSUBISHI_HEAVY_INDUSTRIES: Self = Self {
        brand: Brand::MitsubishiHeavyIndustries,
        field_map: FieldMap::MITSUBISHI_HEAVY_INDUSTRIES,
        outside_temperature: OutsideTemperatureRule::ZeroIsAbsent,
        instant_power: InstantPowerSource::Amps {
            nominal_voltage: NOMINAL_VOLTAGE,
        },
        energy_counter: true,
        echo: EchoPolicy::MirrorLocally,
        enums: MHI_SETS,
        default_polling_interval_minutes: 1,
    };

    /// LG profile.
    pub const LG: Self = Self {
        brand: Brand::Lg,
        field_map: FieldMap::LG,
        outside_temperature: OutsideTemperatureRule::ZeroIsAbsent,
        instant_power: InstantPowerSource::Unsupported,
        energy_counter: false,
        echo: EchoPolicy::MirrorLocally,
        enums: LG_SETS,
        default_polling_interval_minutes: 1,
    };

    /// Legacy generic controller profile.
    pub const GENERIC_LEGACY: Self = Self {
        brand: Brand::GenericLegacy,
        field_map: FieldMap::GENERIC_LEGACY,
        outside_temperature: OutsideTemperatureRule::ZeroIsAbsent,
        instant_power: InstantPowerSource::Watts,
        energy_counter: true,
        echo: EchoPolicy::Repoll,
        enums: ME_SETS,
        default_polling_interval_minutes: 5,
    };

    /// Returns the built-in profile for a brand.
    #[must_use]
    pub const fn for_brand(brand: Brand) -> Self {
        match brand {
            Brand::MitsubishiElectric => Self::MITSUBISHI_ELECTRIC,
            Brand::MitsubishiHeavyIndustries => Self::MITSUBISHI_HEAVY_INDUSTRIES,
            Brand::Lg => Self::LG,
            Brand::GenericLegacy => Self::GENERIC_LEGACY,
        }
    }

    /// Returns `true` if the brand reports power or energy readings.
    #[must_use]
    pub fn has_energy_monitoring(&self) -> bool {
        self.energy_counter || self.instant_power.is_supported()
    }

    /// Returns the allowed values of an enumerated control, or `None` for
    /// numeric and boolean controls.
    #[must_use]
    pub const fn allowed_values(&self, kind: CommandKind) -> Option<&'static [&'static str]> {
        match kind {
            CommandKind::OperatingMode => Some(self.enums.operating_modes),
            CommandKind::FanSpeed => Some(self.enums.fan_speeds),
            CommandKind::VaneMode => Some(self.enums.vane_modes),
            CommandKind::WideVaneMode => Some(self.enums.wide_vane_modes),
            CommandKind::Power | CommandKind::TargetTemperature | CommandKind::RemoteTemperature => {
                None
            }
        }
    }

    /// Checks an enumerated value against the brand's allowed set.
    ///
    /// Controls without an enumerated domain accept any value here.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NotAllowed`] if the value is not in the set.
    pub fn validate(&self, kind: CommandKind, value: &str) -> Result<(), ValueError> {
        match self.allowed_values(kind) {
            Some(allowed) if !allowed.contains(&value) => Err(ValueError::NotAllowed {
                brand: self.brand.display_name(),
                control: control_name(kind),
                value: value.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl From<Brand> for BrandProfile {
    fn from(brand: Brand) -> Self {
        Self::for_brand(brand)
    }
}

fn control_name(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Power => "power state",
        CommandKind::TargetTemperature => "target temperature",
        CommandKind::OperatingMode => "operating mode",
        CommandKind::FanSpeed => "fan speed",
        CommandKind::VaneMode => "vane mode",
        CommandKind::WideVaneMode => "wide vane mode",
        CommandKind::RemoteTemperature => "remote temperature",
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heat-pump commands.
//!
//! A [`Command`] is a brand-independent write. Before anything goes on the
//! wire it is validated against the session's brand profile and translated
//! into the brand's field name by [`prepare`].
//!
//! # Available Commands
//!
//! | Command | Logical field | Example value |
//! |---------|---------------|---------------|
//! | [`Command::Power`] | `power` | `on` |
//! | [`Command::TargetTemperature`] | `set_temperature` | `21.5` |
//! | [`Command::OperatingMode`] | `operating_mode` | `heat` |
//! | [`Command::FanSpeed`] | `fan_speed` | `auto` |
//! | [`Command::VaneMode`] | `vane_mode` | `swing` |
//! | [`Command::WideVaneMode`] | `wide_vane_mode` | `middle` |
//! | [`Command::RemoteTemperature`] | `remote_temperature` | `19.8` |
//!
//! # Examples
//!
//! ```
//! use climactl_lib::command::{prepare, Command};
//! use climactl_lib::profile::BrandProfile;
//!
//! let wire = prepare(&BrandProfile::LG, &Command::WideVaneMode("3".into())).unwrap();
//! assert_eq!(wire.field(), "vane0");
//! assert_eq!(wire.value(), "3");
//!
//! // Not part of the LG fan speed set.
//! assert!(prepare(&BrandProfile::LG, &Command::FanSpeed("superhigh".into())).is_err());
//! ```

mod dispatch;

pub use dispatch::{dispatch, prepare, Echo, WireCommand};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::profile::BrandProfile;
use crate::state::StateChange;
use crate::types::{CommandKind, PowerState};

/// A brand-independent write to a heat pump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Command {
    /// Switch the unit on or off.
    Power(PowerState),
    /// Set the target temperature in °C.
    TargetTemperature(f64),
    /// Set the operating mode.
    OperatingMode(String),
    /// Set the fan speed.
    FanSpeed(String),
    /// Set the vertical vane position.
    VaneMode(String),
    /// Set the horizontal vane position.
    WideVaneMode(String),
    /// Push an externally measured room temperature in °C.
    RemoteTemperature(f64),
}

impl Command {
    /// Builds a command from a kind and its textual value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if the value cannot be parsed for this kind.
    pub fn parse(kind: CommandKind, value: &str) -> Result<Self, ValueError> {
        let value = value.trim();
        let temperature = || {
            value
                .parse::<f64>()
                .map_err(|_| ValueError::InvalidTemperature(value.to_string()))
        };

        Ok(match kind {
            CommandKind::Power => Self::Power(value.parse()?),
            CommandKind::TargetTemperature => Self::TargetTemperature(temperature()?),
            CommandKind::RemoteTemperature => Self::RemoteTemperature(temperature()?),
            CommandKind::OperatingMode => Self::OperatingMode(value.to_string()),
            CommandKind::FanSpeed => Self::FanSpeed(value.to_string()),
            CommandKind::VaneMode => Self::VaneMode(value.to_string()),
            CommandKind::WideVaneMode => Self::WideVaneMode(value.to_string()),
        })
    }

    /// Returns the kind of this command.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Power(_) => CommandKind::Power,
            Self::TargetTemperature(_) => CommandKind::TargetTemperature,
            Self::OperatingMode(_) => CommandKind::OperatingMode,
            Self::FanSpeed(_) => CommandKind::FanSpeed,
            Self::VaneMode(_) => CommandKind::VaneMode,
            Self::WideVaneMode(_) => CommandKind::WideVaneMode,
            Self::RemoteTemperature(_) => CommandKind::RemoteTemperature,
        }
    }

    /// Returns the value as sent on the wire.
    #[must_use]
    pub fn wire_value(&self) -> String {
        match self {
            Self::Power(state) => state.as_str().to_string(),
            Self::TargetTemperature(t) | Self::RemoteTemperature(t) => t.to_string(),
            Self::OperatingMode(v) | Self::FanSpeed(v) | Self::VaneMode(v) | Self::WideVaneMode(v) => {
                v.clone()
            }
        }
    }

    /// Checks the value against the brand's domain.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::NonFiniteTemperature`] for NaN or infinite
    /// temperatures and [`ValueError::NotAllowed`] for enumerated values outside
    /// the brand's set.
    pub fn validate(&self, profile: &BrandProfile) -> Result<(), ValueError> {
        match self {
            Self::TargetTemperature(t) | Self::RemoteTemperature(t) if !t.is_finite() => {
                Err(ValueError::NonFiniteTemperature(*t))
            }
            Self::OperatingMode(v) | Self::FanSpeed(v) | Self::VaneMode(v) | Self::WideVaneMode(v) => {
                profile.validate(self.kind(), v)
            }
            _ => Ok(()),
        }
    }

    /// Returns the state change a successful write implies.
    #[must_use]
    pub fn to_state_change(&self) -> StateChange {
        match self {
            Self::Power(state) => StateChange::Power(state.is_on()),
            Self::TargetTemperature(t) => StateChange::TargetTemperature(*t),
            Self::OperatingMode(v) => StateChange::OperatingMode(v.clone()),
            Self::FanSpeed(v) => StateChange::FanSpeed(v.clone()),
            Self::VaneMode(v) => StateChange::VaneMode(v.clone()),
            Self::WideVaneMode(v) => StateChange::WideVaneMode(v.clone()),
            Self::RemoteTemperature(t) => StateChange::RemoteTemperature(*t),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind(), self.wire_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_from_kind_and_text() {
        assert_eq!(
            Command::parse(CommandKind::Power, "on").unwrap(),
            Command::Power(PowerState::On)
        );
        assert_eq!(
            Command::parse(CommandKind::TargetTemperature, " 21.5 ").unwrap(),
            Command::TargetTemperature(21.5)
        );
        assert_eq!(
            Command::parse(CommandKind::FanSpeed, "auto").unwrap(),
            Command::FanSpeed("auto".into())
        );
        assert!(Command::parse(CommandKind::Power, "maybe").is_err());
        assert!(Command::parse(CommandKind::RemoteTemperature, "warm").is_err());
    }

    #[test]
    fn wire_values() {
        assert_eq!(Command::Power(PowerState::Off).wire_value(), "off");
        assert_eq!(Command::TargetTemperature(21.0).wire_value(), "21");
        assert_eq!(Command::TargetTemperature(21.5).wire_value(), "21.5");
        assert_eq!(Command::VaneMode("swing".into()).wire_value(), "swing");
    }

    #[test]
    fn non_finite_temperatures_are_rejected() {
        let profile = BrandProfile::MITSUBISHI_ELECTRIC;
        assert!(matches!(
            Command::TargetTemperature(f64::NAN).validate(&profile),
            Err(ValueError::NonFiniteTemperature(_))
        ));
        assert!(Command::RemoteTemperature(f64::INFINITY).validate(&profile).is_err());
        assert!(Command::TargetTemperature(-5.0).validate(&profile).is_ok());
    }

    #[test]
    fn enumerated_values_use_brand_sets() {
        let me = BrandProfile::MITSUBISHI_ELECTRIC;
        let mhi = BrandProfile::MITSUBISHI_HEAVY_INDUSTRIES;
        let cmd = Command::FanSpeed("superhigh".into());

        assert!(cmd.validate(&me).is_ok());
        assert!(matches!(
            cmd.validate(&mhi),
            Err(ValueError::NotAllowed { control: "fan speed", .. })
        ));
    }

    #[test]
    fn state_changes() {
        assert_eq!(
            Command::Power(PowerState::On).to_state_change(),
            StateChange::Power(true)
        );
        assert_eq!(
            Command::RemoteTemperature(19.5).to_state_change(),
            StateChange::RemoteTemperature(19.5)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Command::OperatingMode("heat".into()).to_string(), "operating_mode=heat");
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&Command::FanSpeed("auto".into())).unwrap();
        assert_eq!(json, r#"{"kind":"fan_speed","value":"auto"}"#);
    }
}

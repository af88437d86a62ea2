// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The normalized climate record.

use serde::{Deserialize, Serialize};

use super::StateChange;

/// What the latest status said about an attached external thermometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorPresence {
    /// A thermometer is paired and reporting.
    Present,
    /// The firmware explicitly reported that no thermometer is paired.
    Absent,
    /// The status carried no usable sensor identity.
    #[default]
    Unknown,
}

impl SensorPresence {
    /// Returns the definite presence, or `None` when unknown.
    #[must_use]
    pub const fn known(self) -> Option<bool> {
        match self {
            Self::Present => Some(true),
            Self::Absent => Some(false),
            Self::Unknown => None,
        }
    }
}

/// Brand-independent state of one heat pump.
///
/// Enumerated controls keep the brand's own spelling (e.g. `"superhigh"` or
/// `"3"`); they are validated against the brand profile only when written.
///
/// `outside_temperature`, `power_consumption`, `instant_power`,
/// `battery_percent` and `humidity_percent` are `None` whenever the firmware
/// did not report a meaningful value. In particular a missing outside reading
/// is never turned into 0 °C.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateState {
    /// Unit is switched on.
    pub power: bool,
    /// Operating mode.
    pub mode: String,
    /// Target temperature in °C.
    pub target_temperature: f64,
    /// Fan speed.
    pub fan_speed: String,
    /// Vertical vane position.
    pub vane_mode: String,
    /// Horizontal vane position.
    pub wide_vane_mode: String,
    /// Room temperature in °C, from the best available source.
    pub measured_temperature: f64,
    /// Outside temperature in °C.
    pub outside_temperature: Option<f64>,
    /// Cumulative energy counter in kWh.
    pub power_consumption: Option<f64>,
    /// Instantaneous power draw in W.
    pub instant_power: Option<f64>,
    /// Outdoor unit is defrosting.
    pub defrost_active: bool,
    /// Thermometer battery level in percent.
    pub battery_percent: Option<f64>,
    /// Relative humidity in percent.
    pub humidity_percent: Option<f64>,
    /// Compressor/indoor unit is actively operating.
    pub operating: bool,
    /// Fault reported by the unit, if any.
    pub fault_code: Option<String>,
    /// External thermometer presence.
    pub sensor: SensorPresence,
}

impl ClimateState {
    /// Applies a change, returning `true` if any field was modified.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Power(on) => replace(&mut self.power, *on),
            StateChange::OperatingMode(mode) => replace_str(&mut self.mode, mode),
            StateChange::TargetTemperature(t) => replace(&mut self.target_temperature, *t),
            StateChange::FanSpeed(speed) => replace_str(&mut self.fan_speed, speed),
            StateChange::VaneMode(vane) => replace_str(&mut self.vane_mode, vane),
            StateChange::WideVaneMode(vane) => replace_str(&mut self.wide_vane_mode, vane),
            StateChange::RemoteTemperature(t) => replace(&mut self.measured_temperature, *t),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn replace_str(slot: &mut String, value: &str) -> bool {
    if slot == value {
        return false;
    }
    value.clone_into(slot);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_presence_known() {
        assert_eq!(SensorPresence::Present.known(), Some(true));
        assert_eq!(SensorPresence::Absent.known(), Some(false));
        assert_eq!(SensorPresence::Unknown.known(), None);
    }

    #[test]
    fn apply_reports_changes() {
        let mut state = ClimateState {
            mode: "heat".to_string(),
            ..ClimateState::default()
        };

        assert!(!state.apply(&StateChange::OperatingMode("heat".to_string())));
        assert!(state.apply(&StateChange::OperatingMode("cool".to_string())));
        assert_eq!(state.mode, "cool");

        assert!(state.apply(&StateChange::TargetTemperature(21.5)));
        assert!(!state.apply(&StateChange::TargetTemperature(21.5)));
    }

    #[test]
    fn remote_temperature_updates_measured() {
        let mut state = ClimateState::default();
        state.apply(&StateChange::RemoteTemperature(19.0));
        assert!((state.measured_temperature - 19.0).abs() < f64::EPSILON);
    }

    #[test]
    fn vane_changes_are_independent() {
        let mut state = ClimateState::default();
        state.apply(&StateChange::VaneMode("swing".to_string()));
        state.apply(&StateChange::WideVaneMode("left".to_string()));
        assert_eq!(state.vane_mode, "swing");
        assert_eq!(state.wide_vane_mode, "left");
    }
}

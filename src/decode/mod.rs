// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status decoding.
//!
//! Every supported controller answers a status request with a JSON object of
//! the form `{"heatpump": {...}, "sensor": {"thermometer": {...}, "external": {...}}}`.
//! The `heatpump` block differs per firmware family; [`decode`] turns it into a
//! [`ClimateState`].
//!
//! Decoding only fails when the payload is not an object or when one of the
//! core fields (`power`, `mode`, `set_temperature`) is missing or mistyped.
//! Everything else falls back to a default.
//!
//! # Examples
//!
//! ```
//! use climactl_lib::decode::{decode, RawStatus};
//! use climactl_lib::types::Brand;
//!
//! let raw = RawStatus::from_json(r#"{
//!     "heatpump": {
//!         "power": "on", "mode": "heat", "set_temperature": 21,
//!         "op": {"current": 2.0, "outdoor": 0, "consumption": 812.4}
//!     }
//! }"#).unwrap();
//!
//! let state = decode(Brand::MitsubishiHeavyIndustries, &raw).unwrap();
//! assert_eq!(state.instant_power, Some(460.0));
//! assert_eq!(state.outside_temperature, None);
//! ```

mod fields;

use serde_json::Value;

use crate::error::DecodeError;
use crate::profile::BrandProfile;
use crate::state::{ClimateState, SensorPresence};
use crate::types::{Brand, CommandKind, PowerState};

use fields::Fields;

/// Sensor names a firmware uses to say "no thermometer paired".
const NO_SENSOR_NAMES: [&str; 2] = ["", "none"];

/// A status payload as received from a controller.
///
/// The payload is opaque to everything except [`decode`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatus(Value);

impl RawStatus {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] if the body is not valid JSON.
    pub fn from_json(body: &str) -> Result<Self, DecodeError> {
        Ok(Self(serde_json::from_str(body)?))
    }

    /// Wraps an already parsed value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawStatus {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Where a firmware keeps its operational readings.
#[derive(Debug, Clone, Copy)]
struct StatusLayout {
    /// Nested block holding the readings, or `None` for the `heatpump` block itself.
    block: Option<&'static str>,
    outside_temperature: &'static str,
    energy_counter: Option<&'static str>,
    instant_power: Option<&'static str>,
    defrost: &'static str,
    fault: FaultField,
}

#[derive(Debug, Clone, Copy)]
enum FaultField {
    /// Free text, empty when healthy.
    Text(&'static str),
    /// Numeric code in the `heatpump` block, 0 when healthy.
    Code(&'static str),
    None,
}

impl StatusLayout {
    const fn for_brand(brand: Brand) -> Self {
        match brand {
            Brand::MitsubishiElectric | Brand::GenericLegacy => Self {
                block: None,
                outside_temperature: "tout",
                energy_counter: Some("tpcns"),
                instant_power: Some("pinp"),
                defrost: "defrost",
                fault: FaultField::Text("fault_code"),
            },
            Brand::MitsubishiHeavyIndustries => Self {
                block: Some("op"),
                outside_temperature: "outdoor",
                energy_counter: Some("consumption"),
                instant_power: Some("current"),
                defrost: "defrost",
                fault: FaultField::Code("error_code"),
            },
            Brand::Lg => Self {
                block: Some("opdata"),
                outside_temperature: "outdoor",
                energy_counter: None,
                instant_power: None,
                defrost: "defrost",
                fault: FaultField::None,
            },
        }
    }
}

/// Decodes a status payload for a brand using its built-in profile.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the payload is not an object or a core field
/// is missing or has the wrong type.
pub fn decode(brand: Brand, raw: &RawStatus) -> Result<ClimateState, DecodeError> {
    decode_with_profile(&BrandProfile::for_brand(brand), raw)
}

/// Decodes a status payload using an explicit profile.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_with_profile(
    profile: &BrandProfile,
    raw: &RawStatus,
) -> Result<ClimateState, DecodeError> {
    let root = Fields::object(raw.as_value(), "status")?;
    let heatpump = root.required_object("heatpump")?;

    let power_raw = heatpump.required_str("power")?;
    let power = power_raw
        .parse::<PowerState>()
        .map_err(|_| DecodeError::InvalidValue {
            field: "power",
            value: power_raw.to_string(),
        })?
        .is_on();
    let mode = heatpump.required_str("mode")?.to_string();
    let target_temperature = heatpump.required_f64("set_temperature")?;

    let layout = StatusLayout::for_brand(profile.brand);
    let readings = match layout.block {
        Some(block) => heatpump.optional_object(block),
        None => Some(heatpump),
    };

    let field_map = &profile.field_map;
    let label = |kind: CommandKind| {
        field_map
            .field(kind)
            .and_then(|key| heatpump.label(key))
            .unwrap_or_default()
    };

    let operating = heatpump.bool("oper").unwrap_or(false);
    let outside_raw = readings.and_then(|r| r.f64(layout.outside_temperature));

    let sensor_block = root.optional_object("sensor");
    let thermometer = sensor_block.and_then(|s| s.optional_object("thermometer"));
    let sensor = sensor_presence(thermometer);
    let attached = thermometer.filter(|_| sensor != SensorPresence::Absent);

    let measured_temperature = attached
        .and_then(|t| t.non_zero_f64("tact"))
        .or_else(|| {
            sensor_block
                .and_then(|s| s.optional_object("external"))
                .and_then(|e| e.non_zero_f64("temperature"))
        })
        .or_else(|| heatpump.f64("actual_temperature"))
        .unwrap_or_default();

    let power_consumption = layout
        .energy_counter
        .filter(|_| profile.energy_counter)
        .and_then(|key| readings.and_then(|r| r.f64(key)));
    let instant_power = profile
        .instant_power
        .to_watts(layout.instant_power.and_then(|key| readings.and_then(|r| r.f64(key))));

    let state = ClimateState {
        power,
        mode,
        target_temperature,
        fan_speed: label(CommandKind::FanSpeed),
        vane_mode: label(CommandKind::VaneMode),
        wide_vane_mode: label(CommandKind::WideVaneMode),
        measured_temperature,
        outside_temperature: profile.outside_temperature.apply(outside_raw, operating),
        power_consumption,
        instant_power,
        defrost_active: readings
            .and_then(|r| r.bool(layout.defrost))
            .unwrap_or(false),
        battery_percent: attached.and_then(|t| t.f64("batt")),
        humidity_percent: attached.and_then(|t| t.f64("hact")),
        operating,
        fault_code: fault_code(heatpump, layout.fault),
        sensor,
    };

    tracing::debug!(
        brand = %profile.brand,
        power = state.power,
        mode = %state.mode,
        sensor = ?state.sensor,
        "Decoded status"
    );

    Ok(state)
}

fn sensor_presence(thermometer: Option<Fields<'_>>) -> SensorPresence {
    match thermometer.and_then(|t| t.str("name")) {
        None => SensorPresence::Unknown,
        Some(name) if NO_SENSOR_NAMES.iter().any(|s| name.eq_ignore_ascii_case(s)) => {
            SensorPresence::Absent
        }
        Some(_) => SensorPresence::Present,
    }
}

fn fault_code(heatpump: Fields<'_>, field: FaultField) -> Option<String> {
    match field {
        FaultField::Text(key) => heatpump
            .str(key)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        FaultField::Code(key) => heatpump
            .f64(key)
            .filter(|code| *code != 0.0)
            .map(|code| code.to_string()),
        FaultField::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawStatus {
        RawStatus::from_value(value)
    }

    fn me_status(tout: f64, oper: bool) -> RawStatus {
        raw(json!({
            "heatpump": {
                "power": "on",
                "mode": "heat",
                "set_temperature": 22.0,
                "fan": "auto",
                "vane": "swing",
                "widevane": "middle",
                "oper": oper,
                "tout": tout,
                "tpcns": 1534.2,
                "pinp": 850,
                "defrost": false,
                "fault_code": "",
                "actual_temperature": 20.5
            },
            "sensor": {
                "thermometer": {"name": "none", "tact": 0, "batt": 0, "hact": 0}
            }
        }))
    }

    #[test]
    fn mitsubishi_electric_full_status() {
        let state = decode(Brand::MitsubishiElectric, &me_status(4.0, true)).unwrap();

        assert!(state.power);
        assert_eq!(state.mode, "heat");
        assert!((state.target_temperature - 22.0).abs() < f64::EPSILON);
        assert_eq!(state.fan_speed, "auto");
        assert_eq!(state.vane_mode, "swing");
        assert_eq!(state.wide_vane_mode, "middle");
        assert!((state.measured_temperature - 20.5).abs() < f64::EPSILON);
        assert_eq!(state.outside_temperature, Some(4.0));
        assert_eq!(state.power_consumption, Some(1534.2));
        assert_eq!(state.instant_power, Some(850.0));
        assert_eq!(state.sensor, SensorPresence::Absent);
        assert_eq!(state.battery_percent, None);
        assert_eq!(state.humidity_percent, None);
        assert_eq!(state.fault_code, None);
    }

    #[test]
    fn zero_outside_temperature_is_absent_while_idle() {
        let state = decode(Brand::MitsubishiElectric, &me_status(0.0, false)).unwrap();
        assert_eq!(state.outside_temperature, None);
    }

    #[test]
    fn zero_outside_temperature_is_real_while_operating() {
        let state = decode(Brand::MitsubishiElectric, &me_status(0.0, true)).unwrap();
        assert_eq!(state.outside_temperature, Some(0.0));
    }

    #[test]
    fn heavy_industries_zero_outdoor_is_always_absent() {
        let status = raw(json!({
            "heatpump": {
                "power": "on", "mode": "cool", "set_temperature": 24,
                "oper": true,
                "op": {"outdoor": 0, "current": 0.0, "consumption": 10.0, "defrost": false}
            }
        }));
        let state = decode(Brand::MitsubishiHeavyIndustries, &status).unwrap();
        assert_eq!(state.outside_temperature, None);
        assert!(state.operating);
    }

    #[test]
    fn heavy_industries_current_is_converted_to_watts() {
        let status = raw(json!({
            "heatpump": {
                "power": "on", "mode": "heat", "set_temperature": 21,
                "fan": "3", "vane": "2", "vanelr": "swing",
                "error_code": 0,
                "op": {"outdoor": -2.5, "current": 2.0, "consumption": 812.4, "defrost": true}
            }
        }));
        let state = decode(Brand::MitsubishiHeavyIndustries, &status).unwrap();

        assert_eq!(state.instant_power, Some(460.0));
        assert_eq!(state.power_consumption, Some(812.4));
        assert_eq!(state.outside_temperature, Some(-2.5));
        assert_eq!(state.wide_vane_mode, "swing");
        assert!(state.defrost_active);
        assert_eq!(state.fault_code, None);
    }

    #[test]
    fn heavy_industries_error_code_is_reported() {
        let status = raw(json!({
            "heatpump": {"power": "off", "mode": "auto", "set_temperature": 20, "error_code": 5}
        }));
        let state = decode(Brand::MitsubishiHeavyIndustries, &status).unwrap();
        assert_eq!(state.fault_code.as_deref(), Some("5"));
    }

    #[test]
    fn lg_reads_vanes_from_field_map() {
        let status = raw(json!({
            "heatpump": {
                "power": "off", "mode": "dry", "set_temperature": 23,
                "fan": 2, "vane0": 4, "vane1": "swing",
                "opdata": {"defrost": true, "outdoor": 12}
            }
        }));
        let state = decode(Brand::Lg, &status).unwrap();

        assert!(!state.power);
        assert_eq!(state.fan_speed, "2");
        assert_eq!(state.vane_mode, "swing");
        assert_eq!(state.wide_vane_mode, "4");
        assert!(state.defrost_active);
        assert_eq!(state.outside_temperature, Some(12.0));
        assert_eq!(state.instant_power, None);
        assert_eq!(state.power_consumption, None);
    }

    #[test]
    fn attached_thermometer_takes_precedence() {
        let status = raw(json!({
            "heatpump": {"power": "on", "mode": "heat", "set_temperature": 21, "actual_temperature": 23.0},
            "sensor": {
                "thermometer": {"name": "ATC_1234", "tact": 19.4, "batt": 87, "hact": 45.5},
                "external": {"temperature": 18.0}
            }
        }));
        let state = decode(Brand::MitsubishiElectric, &status).unwrap();

        assert_eq!(state.sensor, SensorPresence::Present);
        assert!((state.measured_temperature - 19.4).abs() < f64::EPSILON);
        assert_eq!(state.battery_percent, Some(87.0));
        assert_eq!(state.humidity_percent, Some(45.5));
    }

    #[test]
    fn unnamed_thermometer_readings_are_used() {
        let status = raw(json!({
            "heatpump": {"power": "on", "mode": "heat", "set_temperature": 21, "actual_temperature": 23.0},
            "sensor": {"thermometer": {"tact": 19.4, "batt": 87, "hact": 45.5}}
        }));
        let state = decode(Brand::MitsubishiElectric, &status).unwrap();

        assert_eq!(state.sensor, SensorPresence::Unknown);
        assert!((state.measured_temperature - 19.4).abs() < f64::EPSILON);
        assert_eq!(state.battery_percent, Some(87.0));
        assert_eq!(state.humidity_percent, Some(45.5));
    }

    #[test]
    fn external_sensor_is_second_choice() {
        let status = raw(json!({
            "heatpump": {"power": "on", "mode": "heat", "set_temperature": 21, "actual_temperature": 23.0},
            "sensor": {
                "thermometer": {"name": "", "tact": 0},
                "external": {"temperature": 18.0}
            }
        }));
        let state = decode(Brand::MitsubishiElectric, &status).unwrap();

        assert_eq!(state.sensor, SensorPresence::Absent);
        assert!((state.measured_temperature - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sentinel_sensor_name_ignores_readings() {
        let status = raw(json!({
            "heatpump": {"power": "on", "mode": "heat", "set_temperature": 21, "actual_temperature": 23.0},
            "sensor": {"thermometer": {"name": "NONE", "tact": 15.0, "batt": 50, "hact": 40}}
        }));
        let state = decode(Brand::MitsubishiElectric, &status).unwrap();

        assert!((state.measured_temperature - 23.0).abs() < f64::EPSILON);
        assert_eq!(state.battery_percent, None);
    }

    #[test]
    fn missing_sensor_block_is_unknown() {
        let status = raw(json!({
            "heatpump": {"power": "on", "mode": "heat", "set_temperature": 21}
        }));
        let state = decode(Brand::MitsubishiElectric, &status).unwrap();

        assert_eq!(state.sensor, SensorPresence::Unknown);
        assert!(state.measured_temperature.abs() < f64::EPSILON);
        assert_eq!(state.fan_speed, "");
        assert_eq!(state.outside_temperature, None);
    }

    #[test]
    fn missing_optional_fields_never_fail() {
        let minimal = json!({"heatpump": {"power": "off", "mode": "auto", "set_temperature": 20}});
        for brand in Brand::ALL {
            assert!(decode(brand, &raw(minimal.clone())).is_ok(), "{brand}");
        }
    }

    #[test]
    fn missing_core_fields_fail() {
        for field in ["power", "mode", "set_temperature"] {
            let mut heatpump = json!({"power": "on", "mode": "heat", "set_temperature": 21});
            heatpump.as_object_mut().unwrap().remove(field);
            let result = decode(Brand::MitsubishiElectric, &raw(json!({ "heatpump": heatpump })));
            assert!(
                matches!(result, Err(DecodeError::MissingField(f)) if f == field),
                "{field}"
            );
        }
    }

    #[test]
    fn mistyped_core_fields_fail() {
        let status = raw(json!({
            "heatpump": {"power": "on", "mode": "heat", "set_temperature": "warm"}
        }));
        assert!(matches!(
            decode(Brand::Lg, &status),
            Err(DecodeError::InvalidType { field: "set_temperature", .. })
        ));

        let status = raw(json!({
            "heatpump": {"power": "maybe", "mode": "heat", "set_temperature": 21}
        }));
        assert!(matches!(
            decode(Brand::Lg, &status),
            Err(DecodeError::InvalidValue { field: "power", .. })
        ));
    }

    #[test]
    fn structurally_invalid_payloads_fail() {
        assert!(matches!(
            decode(Brand::MitsubishiElectric, &raw(json!([]))),
            Err(DecodeError::NotAnObject("status"))
        ));
        assert!(matches!(
            decode(Brand::MitsubishiElectric, &raw(json!({}))),
            Err(DecodeError::MissingField("heatpump"))
        ));
        assert!(RawStatus::from_json("not json").is_err());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exposed capabilities and their reconciliation.
//!
//! A session exposes a set of named capabilities to the host platform. The
//! shape of that set depends on the brand (brand-qualified names such as
//! `me_fan_speed`, energy readings) and on live hardware state (an external
//! thermometer adds battery and humidity readings).
//!
//! [`reconcile`] is a pure function computing the delta between the exposed
//! set and the one the latest status calls for. Applying the delta and
//! reconciling again always yields an empty delta.
//!
//! # Examples
//!
//! ```
//! use climactl_lib::capabilities::{reconcile, CapabilitySet};
//! use climactl_lib::types::Brand;
//!
//! let mut caps = CapabilitySet::from_names(["onoff", "operating_mode"]);
//! let delta = reconcile(&caps, Brand::MitsubishiElectric, false);
//!
//! assert!(delta.to_add.contains("me_operating_mode"));
//! assert!(delta.to_remove.contains("operating_mode"));
//!
//! caps.apply(&delta);
//! assert!(reconcile(&caps, Brand::MitsubishiElectric, false).is_empty());
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::profile::BrandProfile;
use crate::types::Brand;

/// On/off switch.
pub const ONOFF: &str = "onoff";
/// Target temperature setpoint.
pub const TARGET_TEMPERATURE: &str = "target_temperature";
/// Room temperature reading.
pub const MEASURE_TEMPERATURE: &str = "measure_temperature";
/// Outside temperature reading.
pub const MEASURE_OUTSIDE_TEMPERATURE: &str = "measure_temperature.outside";
/// Instantaneous power reading.
pub const MEASURE_POWER: &str = "measure_power";
/// Cumulative energy counter.
pub const METER_POWER: &str = "meter_power";
/// Thermometer battery level.
pub const MEASURE_BATTERY: &str = "measure_battery";
/// Thermometer humidity reading.
pub const MEASURE_HUMIDITY: &str = "measure_humidity";

/// Capability families that carry the brand prefix on qualified brands.
pub const BRAND_FAMILIES: [&str; 5] = [
    "operating_mode",
    "fan_speed",
    "vane_mode",
    "wide_vane_mode",
    "defrost_active",
];

/// Names used by first-generation firmware before the capability families
/// existed. No brand exposes them any more.
pub const FIRST_GENERATION: [&str; 2] = ["thermostat_mode", "fan_mode"];

/// Capabilities backed by an external thermometer.
pub const SENSOR_CAPABILITIES: [&str; 2] = [MEASURE_BATTERY, MEASURE_HUMIDITY];

const COMMON: [&str; 4] = [
    ONOFF,
    TARGET_TEMPERATURE,
    MEASURE_TEMPERATURE,
    MEASURE_OUTSIDE_TEMPERATURE,
];

const ENERGY: [&str; 2] = [MEASURE_POWER, METER_POWER];

/// Default increment of the target temperature control, in °C.
pub const DEFAULT_TEMPERATURE_STEP: f64 = 0.5;

/// Returns the brand-specific name of a capability family.
///
/// `GenericLegacy` keeps the unqualified name.
#[must_use]
pub fn qualified_name(brand: Brand, family: &str) -> String {
    match brand.prefix() {
        Some(prefix) => format!("{prefix}_{family}"),
        None => family.to_string(),
    }
}

/// The set of capability names exposed for one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    names: BTreeSet<String>,
}

impl CapabilitySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from capability names, e.g. restored from a store.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the capability is exposed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of exposed capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no capability is exposed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the capability names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns `true` if every sensor-backed capability is exposed.
    #[must_use]
    pub fn has_sensor_capabilities(&self) -> bool {
        SENSOR_CAPABILITIES.iter().all(|name| self.contains(name))
    }

    /// Applies a delta: removals first, then additions.
    pub fn apply(&mut self, delta: &CapabilityDelta) {
        for name in &delta.to_remove {
            self.names.remove(name);
        }
        self.names.extend(delta.to_add.iter().cloned());
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Changes to bring an exposed set in line with the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityDelta {
    /// Capabilities to expose.
    pub to_add: BTreeSet<String>,
    /// Capabilities to withdraw.
    pub to_remove: BTreeSet<String>,
}

impl CapabilityDelta {
    /// Returns `true` if nothing needs to change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Options attached to individual capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapabilityOptions {
    /// Increment of the target temperature control, in °C.
    pub target_temperature_step: f64,
}

impl Default for CapabilityOptions {
    fn default() -> Self {
        Self {
            target_temperature_step: DEFAULT_TEMPERATURE_STEP,
        }
    }
}

/// Returns the full set a device of this brand should expose.
#[must_use]
pub fn target_capabilities(brand: Brand, sensor_present: bool) -> CapabilitySet {
    let mut names: BTreeSet<String> = COMMON.iter().map(ToString::to_string).collect();
    names.extend(BRAND_FAMILIES.iter().map(|family| qualified_name(brand, family)));

    if BrandProfile::for_brand(brand).has_energy_monitoring() {
        names.extend(ENERGY.iter().map(ToString::to_string));
    }
    if sensor_present {
        names.extend(SENSOR_CAPABILITIES.iter().map(ToString::to_string));
    }

    CapabilitySet { names }
}

/// Computes the delta between the exposed set and the brand's target set.
///
/// - Every target capability that is missing is added.
/// - Unqualified family names are removed once the brand uses qualified ones.
/// - First-generation names are always removed.
/// - Sensor-backed capabilities are removed when `sensor_present` is `false`.
///
/// Nothing else is ever removed, in particular not brand-qualified names.
#[must_use]
pub fn reconcile(current: &CapabilitySet, brand: Brand, sensor_present: bool) -> CapabilityDelta {
    let target = target_capabilities(brand, sensor_present);

    let to_add = target
        .names
        .iter()
        .filter(|name| !current.contains(name))
        .cloned()
        .collect();

    let legacy = BRAND_FAMILIES
        .iter()
        .copied()
        .filter(|_| brand.is_qualified());
    let absent_sensor = SENSOR_CAPABILITIES
        .iter()
        .copied()
        .filter(|_| !sensor_present);

    let to_remove = legacy
        .chain(FIRST_GENERATION)
        .chain(absent_sensor)
        .filter(|name| current.contains(name))
        .map(ToString::to_string)
        .collect();

    CapabilityDelta { to_add, to_remove }
}

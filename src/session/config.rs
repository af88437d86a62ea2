// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capabilities::DEFAULT_TEMPERATURE_STEP;
use crate::error::ValueError;
use crate::profile::BrandProfile;
use crate::protocol::ApiEndpoint;
use crate::types::Brand;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_temperature_step() -> f64 {
    DEFAULT_TEMPERATURE_STEP
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Everything needed to (re)create a session.
///
/// The host persists this as store values and restores it on restart.
///
/// # Examples
///
/// ```
/// use climactl_lib::protocol::ApiEndpoint;
/// use climactl_lib::session::SessionConfig;
/// use climactl_lib::types::Brand;
/// use std::time::Duration;
///
/// let config = SessionConfig::new(Brand::Lg, ApiEndpoint::new("192.168.1.42"))
///     .with_friendly_name("Bedroom")
///     .with_polling_interval_minutes(5);
///
/// assert_eq!(config.polling_interval(), Duration::from_secs(300));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Firmware family of the unit.
    pub brand: Brand,
    /// Control endpoint.
    pub endpoint: ApiEndpoint,
    /// Display name.
    #[serde(default)]
    pub friendly_name: Option<String>,
    /// Minutes between polls; `None` uses the brand default.
    #[serde(default)]
    pub polling_interval_minutes: Option<u32>,
    /// Increment of the target temperature control, in °C.
    #[serde(default = "default_temperature_step")]
    pub temperature_step: f64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl SessionConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new(brand: Brand, endpoint: ApiEndpoint) -> Self {
        Self {
            brand,
            endpoint,
            friendly_name: None,
            polling_interval_minutes: None,
            temperature_step: DEFAULT_TEMPERATURE_STEP,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Sets a display name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the polling interval.
    #[must_use]
    pub fn with_polling_interval_minutes(mut self, minutes: u32) -> Self {
        self.polling_interval_minutes = Some(minutes);
        self
    }

    /// Sets the target temperature step.
    #[must_use]
    pub fn with_temperature_step(mut self, step: f64) -> Self {
        self.temperature_step = step;
        self
    }

    /// Sets the request timeout. Sub-second parts are dropped.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Returns the brand profile.
    #[must_use]
    pub fn profile(&self) -> BrandProfile {
        BrandProfile::for_brand(self.brand)
    }

    /// Returns the effective polling interval.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        let minutes = self
            .polling_interval_minutes
            .unwrap_or(self.profile().default_polling_interval_minutes);
        Duration::from_secs(u64::from(minutes) * 60)
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the HTTP transport configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn http_config(&self) -> crate::protocol::HttpConfig {
        crate::protocol::HttpConfig::new(self.endpoint.clone()).with_timeout(self.request_timeout())
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] for a zero polling interval or a temperature
    /// step that is not a positive finite number.
    pub fn validate(&self) -> Result<(), ValueError> {
        validate_interval(self.polling_interval_minutes)?;
        validate_step(Some(self.temperature_step))
    }

    /// Applies a settings update.
    pub(crate) fn apply(&mut self, settings: &SessionSettings) {
        if let Some(minutes) = settings.polling_interval_minutes {
            self.polling_interval_minutes = Some(minutes);
        }
        if let Some(step) = settings.temperature_step {
            self.temperature_step = step;
        }
    }
}

/// Update of a live session's user settings.
///
/// Unset fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// New polling interval in minutes.
    pub polling_interval_minutes: Option<u32>,
    /// New target temperature step.
    pub temperature_step: Option<f64>,
}

impl SessionSettings {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the polling interval.
    #[must_use]
    pub fn with_polling_interval_minutes(mut self, minutes: u32) -> Self {
        self.polling_interval_minutes = Some(minutes);
        self
    }

    /// Sets the temperature step.
    #[must_use]
    pub fn with_temperature_step(mut self, step: f64) -> Self {
        self.temperature_step = Some(step);
        self
    }

    /// Checks the values that are set.
    ///
    /// # Errors
    ///
    /// See [`SessionConfig::validate`].
    pub fn validate(&self) -> Result<(), ValueError> {
        validate_interval(self.polling_interval_minutes)?;
        validate_step(self.temperature_step)
    }
}

fn validate_interval(minutes: Option<u32>) -> Result<(), ValueError> {
    match minutes {
        Some(0) => Err(ValueError::InvalidPollingInterval(0)),
        _ => Ok(()),
    }
}

fn validate_step(step: Option<f64>) -> Result<(), ValueError> {
    match step {
        Some(step) if !step.is_finite() || step <= 0.0 => {
            Err(ValueError::InvalidTemperatureStep(step))
        }
        _ => Ok(()),
    }
}

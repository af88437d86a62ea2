// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Address of a controller's local HTTP API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Where a controller's control endpoint lives.
///
/// # Examples
///
/// ```
/// use climactl_lib::protocol::ApiEndpoint;
///
/// let endpoint = ApiEndpoint::new("192.168.1.40").with_port(8080);
/// assert_eq!(endpoint.status_url(), "http://192.168.1.40:8080/control");
/// assert_eq!(
///     endpoint.command_url("fan", "superhigh"),
///     "http://192.168.1.40:8080/control?cmd=heatpump&fan=superhigh"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApiEndpoint {
    address: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_path")]
    path: String,
}

fn default_port() -> u16 {
    ApiEndpoint::DEFAULT_PORT
}

fn default_path() -> String {
    ApiEndpoint::DEFAULT_PATH.to_string()
}

impl ApiEndpoint {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default control path.
    pub const DEFAULT_PATH: &'static str = "/control";

    /// Creates an endpoint on the default port and path.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: Self::DEFAULT_PORT,
            path: Self::DEFAULT_PATH.to_string(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets a custom control path. A missing leading `/` is added.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    /// Returns the address (host name or IP).
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the control path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checks that the endpoint can be turned into a URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidAddress`] for an empty address or one
    /// containing whitespace or a scheme.
    pub fn validate(&self) -> Result<(), TransportError> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(TransportError::InvalidAddress("address is empty".to_string()));
        }
        if address.contains("://") || address.chars().any(char::is_whitespace) {
            return Err(TransportError::InvalidAddress(self.address.clone()));
        }
        Ok(())
    }

    /// URL polled for status.
    #[must_use]
    pub fn status_url(&self) -> String {
        format!("http://{}:{}{}", self.address, self.port, self.path)
    }

    /// URL that writes one field.
    #[must_use]
    pub fn command_url(&self, field: &str, value: &str) -> String {
        format!(
            "{}?cmd=heatpump&{}={}",
            self.status_url(),
            urlencoding::encode(field),
            urlencoding::encode(value)
        )
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.address, self.port, self.path)
    }
}

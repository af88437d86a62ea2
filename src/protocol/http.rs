// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for heat-pump controllers.

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, Response};

use crate::decode::RawStatus;
use crate::error::{CommandError, ProtocolError, StatusError, TransportError};
use crate::protocol::{ApiEndpoint, Transport};

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for an HTTP transport.
///
/// # Examples
///
/// ```
/// use climactl_lib::protocol::{ApiEndpoint, HttpConfig};
/// use std::time::Duration;
///
/// let config = HttpConfig::new(ApiEndpoint::new("192.168.1.40"))
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    endpoint: ApiEndpoint,
    timeout: Duration,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given endpoint.
    #[must_use]
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self {
            endpoint,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an [`HttpTransport`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is invalid or the HTTP client cannot be
    /// created.
    pub fn into_transport(self) -> Result<HttpTransport, TransportError> {
        self.endpoint.validate()?;

        let client = Client::builder().timeout(self.timeout).build()?;

        Ok(HttpTransport {
            client,
            endpoint: RwLock::new(self.endpoint),
            timeout: self.timeout,
        })
    }
}

// ============================================================================
// HttpTransport
// ============================================================================

/// Transport talking to a controller's local HTTP API.
///
/// The target endpoint can be swapped at any time with
/// [`Transport::rehome`]; requests already in flight finish against the old
/// address.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: RwLock<ApiEndpoint>,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is invalid or the HTTP client cannot be
    /// created.
    pub fn new(endpoint: ApiEndpoint) -> Result<Self, TransportError> {
        HttpConfig::new(endpoint).into_transport()
    }

    async fn get(&self, url: &str) -> Result<Response, StatusError> {
        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::UnexpectedStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
            .into());
        }

        Ok(response)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            TransportError::Timeout(millis)
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidAddress(err.to_string())
        } else {
            TransportError::Http(err)
        }
    }
}

impl Transport for HttpTransport {
    async fn fetch_status(&self) -> Result<RawStatus, StatusError> {
        let url = self.endpoint.read().status_url();
        let response = self.get(&url).await?;
        let body = response.text().await.map_err(|e| self.classify(e))?;

        tracing::debug!(body = %body, "Received status");

        Ok(RawStatus::from_json(&body)?)
    }

    async fn send(&self, field: &str, value: &str) -> Result<(), CommandError> {
        let url = self.endpoint.read().command_url(field, value);

        match self.get(&url).await {
            Ok(_) => Ok(()),
            Err(StatusError::Transport(e)) => Err(CommandError::Unreachable(e)),
            Err(StatusError::Protocol(e)) => Err(CommandError::Rejected(e)),
            Err(StatusError::Decode(e)) => Err(CommandError::Malformed(e.to_string())),
        }
    }

    fn rehome(&self, endpoint: ApiEndpoint) {
        *self.endpoint.write() = endpoint;
    }

    fn endpoint(&self) -> ApiEndpoint {
        self.endpoint.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpConfig::new(ApiEndpoint::new("192.168.1.40"));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.endpoint().address(), "192.168.1.40");
    }

    #[test]
    fn into_transport_rejects_bad_address() {
        let result = HttpConfig::new(ApiEndpoint::new("")).into_transport();
        assert!(matches!(result, Err(TransportError::InvalidAddress(_))));
    }

    #[test]
    fn rehome_swaps_endpoint() {
        let transport = HttpTransport::new(ApiEndpoint::new("192.168.1.40")).unwrap();
        transport.rehome(ApiEndpoint::new("192.168.1.41").with_port(8080));

        let endpoint = transport.endpoint();
        assert_eq!(endpoint.address(), "192.168.1.41");
        assert_eq!(endpoint.port(), 8080);
    }
}

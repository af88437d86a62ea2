// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transports for communicating with heat-pump controllers.
//!
//! Controllers expose an unauthenticated HTTP API:
//!
//! - `GET http://{address}:{port}{path}` returns the JSON status.
//! - `GET http://{address}:{port}{path}?cmd=heatpump&{field}={value}` writes
//!   one field; any 2xx answer means success.
//!
//! [`HttpTransport`] implements this on top of `reqwest`. Sessions only see
//! the [`Transport`] trait, so tests can substitute a scripted transport.

mod endpoint;
#[cfg(feature = "http")]
mod http;
#[cfg(test)]
pub(crate) mod scripted;

pub use endpoint::ApiEndpoint;
#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpTransport};

use std::future::Future;

use crate::decode::RawStatus;
use crate::error::{CommandError, StatusError};

/// Trait for transports that can fetch status and write fields.
///
/// Futures returned by a transport must be `Send` so that a session can poll
/// from a spawned task.
pub trait Transport: Send + Sync + 'static {
    /// Fetches and parses the current status payload.
    ///
    /// # Errors
    ///
    /// Returns a [`StatusError`] on connection failure, a non-2xx answer or a
    /// body that is not JSON.
    fn fetch_status(&self) -> impl Future<Output = Result<RawStatus, StatusError>> + Send;

    /// Writes one wire field.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Unreachable`] on connection failure and
    /// [`CommandError::Rejected`] on a non-2xx answer.
    fn send(
        &self,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), CommandError>> + Send;

    /// Points the transport at a new endpoint.
    fn rehome(&self, endpoint: ApiEndpoint);

    /// Returns the current endpoint.
    fn endpoint(&self) -> ApiEndpoint;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn fetch_status(&self) -> impl Future<Output = Result<RawStatus, StatusError>> + Send {
        (**self).fetch_status()
    }

    fn send(
        &self,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), CommandError>> + Send {
        (**self).send(field, value)
    }

    fn rehome(&self, endpoint: ApiEndpoint) {
        (**self).rehome(endpoint);
    }

    fn endpoint(&self) -> ApiEndpoint {
        (**self).endpoint()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `climactl` library.
//!
//! The hierarchy mirrors the layers a request goes through: the transport
//! (connection refused, timeout), the HTTP protocol (non-2xx answers), the
//! status decoder (malformed payloads) and the command path, which wraps the
//! first two and adds local validation failures.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A value failed local validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The device could not be reached.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The device answered with a non-success status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A status payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A command was not applied by the device.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// No session is registered under the requested identifier.
    #[error("session not found")]
    SessionNotFound,

    /// The session has been deleted and accepts no further work.
    #[error("session has been deleted")]
    SessionDeleted,
}

impl From<StatusError> for Error {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::Transport(e) => Self::Transport(e),
            StatusError::Protocol(e) => Self::Protocol(e),
            StatusError::Decode(e) => Self::Decode(e),
        }
    }
}

/// Errors related to local validation of values and settings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// The value is not part of the brand's allowed set for this control.
    #[error("{value:?} is not a valid {control} for {brand}")]
    NotAllowed {
        /// Brand display name.
        brand: &'static str,
        /// The control being set (e.g. "fan speed").
        control: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A temperature is NaN or infinite.
    #[error("temperature {0} is not a finite number")]
    NonFiniteTemperature(f64),

    /// A temperature could not be parsed.
    #[error("invalid temperature: {0}")]
    InvalidTemperature(String),

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An unknown brand identifier was provided.
    #[error("unknown brand: {0}")]
    UnknownBrand(String),

    /// The polling interval must be at least one minute.
    #[error("polling interval must be at least 1 minute, got {0}")]
    InvalidPollingInterval(u32),

    /// The temperature step must be a positive finite number.
    #[error("temperature step must be positive, got {0}")]
    InvalidTemperatureStep(f64),
}

/// Errors raised before an HTTP response is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request could not be completed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to the HTTP exchange itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The device answered with a non-2xx status.
    #[error("HTTP {status} - {reason}")]
    UnexpectedStatus {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },
}

/// Errors related to decoding a status payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload (or a required block of it) is not a JSON object.
    #[error("expected a JSON object at {0}")]
    NotAnObject(&'static str),

    /// A required field is missing.
    #[error("missing field in status: {0}")]
    MissingField(&'static str),

    /// A required field has the wrong JSON type.
    #[error("field {field} should be {expected}")]
    InvalidType {
        /// The offending field.
        field: &'static str,
        /// Human readable expected type.
        expected: &'static str,
    },

    /// A required field holds a value outside its domain.
    #[error("field {field} has invalid value {value:?}")]
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// The raw value.
        value: String,
    },
}

/// Failure of one status fetch: transport, protocol or decode.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The device could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The device answered with a non-success status.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The answer was not a valid status payload.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Coarse classification of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandErrorKind {
    /// Connection failure or timeout.
    Unreachable,
    /// The device answered with a non-2xx status.
    Rejected,
    /// The command violates the brand's wire format.
    Malformed,
}

/// Errors returned by the command path.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The device could not be reached.
    #[error("device unreachable: {0}")]
    Unreachable(#[from] TransportError),

    /// The device refused the request.
    #[error("command rejected: {0}")]
    Rejected(#[from] ProtocolError),

    /// The command cannot be expressed on this brand's wire protocol.
    #[error("malformed command: {0}")]
    Malformed(String),
}

impl CommandError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> CommandErrorKind {
        match self {
            Self::Unreachable(_) => CommandErrorKind::Unreachable,
            Self::Rejected(_) => CommandErrorKind::Rejected,
            Self::Malformed(_) => CommandErrorKind::Malformed,
        }
    }
}

impl From<ValueError> for CommandError {
    fn from(err: ValueError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::NotAllowed {
            brand: "Mitsubishi Electric",
            control: "fan speed",
            value: "turbo".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "\"turbo\" is not a valid fan speed for Mitsubishi Electric"
        );
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::UnexpectedStatus {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 - Service Unavailable");
    }

    #[test]
    fn command_error_kinds() {
        let unreachable = CommandError::from(TransportError::Timeout(10_000));
        assert_eq!(unreachable.kind(), CommandErrorKind::Unreachable);

        let rejected = CommandError::from(ProtocolError::UnexpectedStatus {
            status: 400,
            reason: "Bad Request".to_string(),
        });
        assert_eq!(rejected.kind(), CommandErrorKind::Rejected);

        let malformed = CommandError::from(ValueError::NonFiniteTemperature(f64::NAN));
        assert_eq!(malformed.kind(), CommandErrorKind::Malformed);
    }

    #[test]
    fn status_error_converts_into_error() {
        let err: Error = StatusError::Decode(DecodeError::MissingField("power")).into();
        assert!(matches!(err, Error::Decode(DecodeError::MissingField("power"))));
    }

    #[test]
    fn decode_error_display() {
        let err = DecodeError::InvalidType {
            field: "set_temperature",
            expected: "a number",
        };
        assert_eq!(err.to_string(), "field set_temperature should be a number");
    }
}

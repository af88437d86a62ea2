// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed accessors over a JSON object.
//!
//! Required accessors fail with a [`DecodeError`]; optional accessors return
//! `None` both for a missing key and for a value of the wrong type, so a
//! firmware that drops or retypes an optional field never breaks decoding.

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Read-only view of one JSON object in a status payload.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wraps a value that must be an object.
    pub(crate) fn object(value: &'a Value, at: &'static str) -> Result<Self, DecodeError> {
        value
            .as_object()
            .map(|map| Self { map })
            .ok_or(DecodeError::NotAnObject(at))
    }

    /// Returns a required nested object.
    pub(crate) fn required_object(&self, key: &'static str) -> Result<Self, DecodeError> {
        let value = self.map.get(key).ok_or(DecodeError::MissingField(key))?;
        Self::object(value, key)
    }

    /// Returns an optional nested object.
    pub(crate) fn optional_object(&self, key: &str) -> Option<Self> {
        self.map
            .get(key)
            .and_then(Value::as_object)
            .map(|map| Self { map })
    }

    /// Returns a required string field.
    pub(crate) fn required_str(&self, key: &'static str) -> Result<&'a str, DecodeError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(DecodeError::MissingField(key)),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(DecodeError::InvalidType {
                field: key,
                expected: "a string",
            }),
        }
    }

    /// Returns a required numeric field.
    pub(crate) fn required_f64(&self, key: &'static str) -> Result<f64, DecodeError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(DecodeError::MissingField(key)),
            Some(value) => value.as_f64().ok_or(DecodeError::InvalidType {
                field: key,
                expected: "a number",
            }),
        }
    }

    /// Returns an optional numeric field.
    pub(crate) fn f64(&self, key: &str) -> Option<f64> {
        self.map.get(key).and_then(Value::as_f64)
    }

    /// Returns an optional numeric field, treating 0 as absent.
    pub(crate) fn non_zero_f64(&self, key: &str) -> Option<f64> {
        self.f64(key).filter(|v| *v != 0.0)
    }

    /// Returns an optional boolean field.
    ///
    /// Some firmwares encode flags as 0/1.
    pub(crate) fn bool(&self, key: &str) -> Option<bool> {
        match self.map.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            _ => None,
        }
    }

    /// Returns an optional string field.
    pub(crate) fn str(&self, key: &str) -> Option<&'a str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// Returns an optional enumerated field as text.
    ///
    /// Vane and fan positions are sometimes reported as bare numbers.
    pub(crate) fn label(&self, key: &str) -> Option<String> {
        match self.map.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

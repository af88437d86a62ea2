// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device sessions.
//!
//! A [`DeviceSession`] ties together everything about one physical unit: its
//! endpoint and brand profile, the poll timer, the exposed capability set and
//! the last published [`ClimateState`](crate::state::ClimateState).
//!
//! Each status cycle fetches the raw status, decodes it, reconciles the
//! capability set against the decoded sensor presence and publishes the
//! state. Commands are validated against the brand profile, sent, and then
//! either mirrored into the published state or followed by a fresh cycle.

mod config;
mod device_session;

pub use config::{SessionConfig, SessionSettings};
pub use device_session::DeviceSession;

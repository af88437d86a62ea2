// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session event types.

use serde::Serialize;

use crate::state::{ClimateState, StateChange};

use super::DeviceId;

/// Why a new state was published.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateCause {
    /// A status cycle decoded a fresh payload.
    Poll,
    /// A command was accepted and mirrored locally.
    Command(StateChange),
}

/// Events emitted by sessions and the session manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// A session was registered.
    SessionAdded {
        /// The session.
        device_id: DeviceId,
    },

    /// A session was deleted and its timer stopped.
    SessionRemoved {
        /// The session.
        device_id: DeviceId,
    },

    /// A new state was published.
    StateChanged {
        /// The session.
        device_id: DeviceId,
        /// What produced the state.
        cause: StateCause,
        /// The full published state.
        state: ClimateState,
    },

    /// The exposed capability set changed.
    CapabilitiesChanged {
        /// The session.
        device_id: DeviceId,
        /// Capabilities now exposed.
        added: Vec<String>,
        /// Capabilities withdrawn.
        removed: Vec<String>,
    },

    /// A status cycle failed; the previous state stays published.
    PollFailed {
        /// The session.
        device_id: DeviceId,
        /// Rendered error.
        error: String,
    },
}

impl DeviceEvent {
    /// Returns the session this event is about.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::SessionAdded { device_id }
            | Self::SessionRemoved { device_id }
            | Self::StateChanged { device_id, .. }
            | Self::CapabilitiesChanged { device_id, .. }
            | Self::PollFailed { device_id, .. } => *device_id,
        }
    }

    /// Returns `true` for session added/removed events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::SessionAdded { .. } | Self::SessionRemoved { .. })
    }

    /// Creates a session added event.
    #[must_use]
    pub fn session_added(device_id: DeviceId) -> Self {
        Self::SessionAdded { device_id }
    }

    /// Creates a session removed event.
    #[must_use]
    pub fn session_removed(device_id: DeviceId) -> Self {
        Self::SessionRemoved { device_id }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(device_id: DeviceId, cause: StateCause, state: ClimateState) -> Self {
        Self::StateChanged {
            device_id,
            cause,
            state,
        }
    }

    /// Creates a capabilities changed event.
    pub fn capabilities_changed<A, R>(device_id: DeviceId, added: A, removed: R) -> Self
    where
        A: IntoIterator<Item = String>,
        R: IntoIterator<Item = String>,
    {
        Self::CapabilitiesChanged {
            device_id,
            added: added.into_iter().collect(),
            removed: removed.into_iter().collect(),
        }
    }

    /// Creates a poll failed event.
    #[must_use]
    pub fn poll_failed(device_id: DeviceId, error: impl ToString) -> Self {
        Self::PollFailed {
            device_id,
            error: error.to_string(),
        }
    }
}

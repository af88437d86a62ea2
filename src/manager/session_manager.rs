// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session manager.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast, watch};

use crate::capabilities::CapabilitySet;
use crate::command::Command;
use crate::error::Error;
use crate::event::{DeviceEvent, DeviceId, EventBus};
use crate::protocol::{ApiEndpoint, Transport};
use crate::session::{DeviceSession, SessionConfig, SessionSettings};
use crate::state::ClimateState;

/// Registry of running sessions.
///
/// Cloning the manager shares the registry and the event bus.
pub struct SessionManager<T> {
    sessions: Arc<RwLock<HashMap<DeviceId, DeviceSession<T>>>>,
    event_bus: EventBus,
}

impl<T: Transport> SessionManager<T> {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates an empty manager with a custom event bus capacity.
    #[must_use]
    pub fn with_capacity(event_capacity: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            event_bus: EventBus::with_capacity(event_capacity),
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribes to the events of every session.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the shared event bus.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Registers and starts a session for a newly paired unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub async fn add_session(&self, config: SessionConfig, transport: T) -> Result<DeviceId, Error> {
        let id = DeviceId::new();
        self.restore_session(id, config, transport, CapabilitySet::new())
            .await?;
        Ok(id)
    }

    /// Registers and starts a session under a known identity, exposing
    /// previously persisted capabilities.
    ///
    /// A session already registered under `id` is deleted first.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub async fn restore_session(
        &self,
        id: DeviceId,
        config: SessionConfig,
        transport: T,
        capabilities: CapabilitySet,
    ) -> Result<(), Error> {
        let session =
            DeviceSession::restore(id, config, transport, self.event_bus.clone(), capabilities)?;

        let previous = self.sessions.write().await.insert(id, session.clone());
        if let Some(previous) = previous {
            previous.delete();
        }
        self.event_bus.publish(DeviceEvent::session_added(id));

        session.start().await;
        Ok(())
    }

    /// Deletes a session. Its timer is stopped before this returns.
    ///
    /// Returns `true` if the session existed.
    pub async fn remove_session(&self, id: DeviceId) -> bool {
        let Some(session) = self.sessions.write().await.remove(&id) else {
            return false;
        };
        session.delete();
        self.event_bus.publish(DeviceEvent::session_removed(id));
        true
    }

    /// Deletes every session.
    pub async fn shutdown(&self) {
        let sessions: Vec<_> = self.sessions.write().await.drain().collect();
        for (id, session) in sessions {
            session.delete();
            self.event_bus.publish(DeviceEvent::session_removed(id));
        }
    }

    /// Returns a handle to a session.
    pub async fn session(&self, id: DeviceId) -> Option<DeviceSession<T>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Returns the identifiers of all sessions.
    pub async fn session_ids(&self) -> Vec<DeviceId> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Returns the number of sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn get(&self, id: DeviceId) -> Result<DeviceSession<T>, Error> {
        self.session(id).await.ok_or(Error::SessionNotFound)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the last published state of a session.
    pub async fn state(&self, id: DeviceId) -> Option<ClimateState> {
        self.session(id).await.and_then(|s| s.state())
    }

    /// Returns a watch receiver for a session's state.
    pub async fn watch(&self, id: DeviceId) -> Option<watch::Receiver<Option<ClimateState>>> {
        self.session(id).await.map(|s| s.watch())
    }

    /// Returns a session's exposed capabilities.
    pub async fn capabilities(&self, id: DeviceId) -> Option<CapabilitySet> {
        self.session(id).await.map(|s| s.capabilities())
    }

    /// Returns a session's configuration for persistence.
    pub async fn config(&self, id: DeviceId) -> Option<SessionConfig> {
        self.session(id).await.map(|s| s.config())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Runs a status cycle for a session now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] or the cycle's error.
    pub async fn poll_now(&self, id: DeviceId) -> Result<(), Error> {
        self.get(id).await?.poll_now().await
    }

    /// Sends a command to a session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] or the command's error.
    pub async fn set_command(&self, id: DeviceId, command: Command) -> Result<(), Error> {
        self.get(id).await?.set_command(command).await
    }

    /// Points a session at a new address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] or an invalid endpoint error.
    pub async fn rehome(&self, id: DeviceId, endpoint: ApiEndpoint) -> Result<(), Error> {
        self.get(id).await?.rehome(endpoint)
    }

    /// Updates a session's settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] or a validation error.
    pub async fn update_settings(&self, id: DeviceId, settings: SessionSettings) -> Result<(), Error> {
        self.get(id).await?.update_settings(settings)
    }
}

#[cfg(feature = "http")]
impl SessionManager<crate::protocol::HttpTransport> {
    /// Registers and starts a session talking HTTP to `config.endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub async fn add_http_session(&self, config: SessionConfig) -> Result<DeviceId, Error> {
        let transport = config.http_config().into_transport()?;
        self.add_session(config, transport).await
    }
}

impl<T: Transport> Default for SessionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SessionManager<T> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            event_bus: self.event_bus.clone(),
        }
    }
}

impl<T> std::fmt::Debug for SessionManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("event_bus", &self.event_bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::scripted::ScriptedTransport;
    use crate::types::{Brand, PowerState};
    use serde_json::json;

    type Manager = SessionManager<Arc<ScriptedTransport>>;

    fn transport() -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport::new(json!({
            "heatpump": {"power": "off", "mode": "cool", "set_temperature": 24, "fan": "2"}
        })))
    }

    fn config() -> SessionConfig {
        SessionConfig::new(Brand::Lg, ApiEndpoint::new("192.0.2.20"))
    }

    #[tokio::test]
    async fn new_manager_is_empty() {
        let manager = Manager::new();
        assert_eq!(manager.session_count().await, 0);
        assert!(manager.session_ids().await.is_empty());
    }

    #[tokio::test]
    async fn add_session_starts_and_publishes() {
        let manager = Manager::new();
        let mut events = manager.subscribe();

        let id = manager.add_session(config(), transport()).await.unwrap();

        assert!(matches!(
            events.recv().await.unwrap(),
            DeviceEvent::SessionAdded { device_id } if device_id == id
        ));
        assert!(manager.state(id).await.is_some());
        assert!(manager.session(id).await.unwrap().is_running());
        manager.shutdown().await;
    }

    #[tokio::test]
    async fn invalid_config_is_rejected() {
        let manager = Manager::new();
        let result = manager
            .add_session(config().with_polling_interval_minutes(0), transport())
            .await;
        assert!(matches!(result, Err(Error::Value(_))));
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn remove_session_deletes_and_publishes() {
        let manager = Manager::new();
        let id = manager.add_session(config(), transport()).await.unwrap();
        let session = manager.session(id).await.unwrap();
        let mut events = manager.subscribe();

        assert!(manager.remove_session(id).await);
        assert!(!manager.remove_session(id).await);
        assert!(session.is_deleted());
        assert!(!session.is_running());
        assert!(matches!(
            events.recv().await.unwrap(),
            DeviceEvent::SessionRemoved { device_id } if device_id == id
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let manager = Manager::new();
        let id = DeviceId::new();

        assert!(manager.state(id).await.is_none());
        assert!(matches!(
            manager.set_command(id, Command::Power(PowerState::On)).await,
            Err(Error::SessionNotFound)
        ));
        assert!(matches!(
            manager.rehome(id, ApiEndpoint::new("192.0.2.30")).await,
            Err(Error::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn operations_reach_the_session() {
        let manager = Manager::new();
        let scripted = transport();
        let id = manager.add_session(config(), Arc::clone(&scripted)).await.unwrap();

        manager
            .set_command(id, Command::FanSpeed("4".into()))
            .await
            .unwrap();
        assert_eq!(manager.state(id).await.unwrap().fan_speed, "4");

        manager
            .rehome(id, ApiEndpoint::new("192.0.2.21"))
            .await
            .unwrap();
        assert_eq!(manager.config(id).await.unwrap().endpoint.address(), "192.0.2.21");

        manager
            .update_settings(id, SessionSettings::new().with_temperature_step(1.0))
            .await
            .unwrap();
        assert!((manager.config(id).await.unwrap().temperature_step - 1.0).abs() < f64::EPSILON);

        manager.poll_now(id).await.unwrap();
        assert_eq!(scripted.fetches(), 2);
        manager.shutdown().await;
    }

    #[tokio::test]
    async fn restore_replaces_existing_session() {
        let manager = Manager::new();
        let id = DeviceId::new();
        manager
            .restore_session(id, config(), transport(), CapabilitySet::new())
            .await
            .unwrap();
        let first = manager.session(id).await.unwrap();

        manager
            .restore_session(id, config(), transport(), CapabilitySet::new())
            .await
            .unwrap();

        assert!(first.is_deleted());
        assert_eq!(manager.session_count().await, 1);
        manager.shutdown().await;
        assert_eq!(manager.session_count().await, 0);
    }
}

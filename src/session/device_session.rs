// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One session per physical unit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::capabilities::{self, CapabilityOptions, CapabilitySet};
use crate::command::{self, Command, Echo};
use crate::decode;
use crate::error::{CommandError, Error};
use crate::event::{DeviceEvent, DeviceId, EventBus, StateCause};
use crate::poller::Poller;
use crate::profile::BrandProfile;
use crate::protocol::{ApiEndpoint, Transport};
use crate::state::{ClimateState, PublishedState, SensorPresence, StateChange};
use crate::types::{Brand, CommandKind};

use super::{SessionConfig, SessionSettings};

/// Exposed capabilities plus what we last knew about the thermometer.
#[derive(Debug)]
struct CapabilityState {
    set: CapabilitySet,
    sensor: Option<bool>,
    options: CapabilityOptions,
}

struct Inner<T> {
    id: DeviceId,
    profile: BrandProfile,
    transport: T,
    config: Mutex<SessionConfig>,
    published: Mutex<PublishedState>,
    state_tx: watch::Sender<Option<ClimateState>>,
    capabilities: Mutex<CapabilityState>,
    cycle: tokio::sync::Mutex<()>,
    poller: Poller,
    deleted: AtomicBool,
    events: EventBus,
}

/// A polled, controllable heat pump.
///
/// The session binds one endpoint and brand profile to one poll timer and one
/// exposed capability set. Handles are cheap to clone and share the session.
///
/// # Concurrency
///
/// - At most one status cycle (fetch, decode, reconcile, publish) runs at a
///   time, whether started by the timer, [`poll_now`](Self::poll_now) or a
///   re-poll after a command.
/// - Commands do not wait for a running cycle. The state a command mirrors
///   and the state a cycle publishes are stamped with wall-clock time; the
///   older of two writes loses.
/// - Capability changes are applied under a session lock, one at a time.
///
/// # Examples
///
/// ```no_run
/// use climactl_lib::command::Command;
/// use climactl_lib::event::{DeviceId, EventBus};
/// use climactl_lib::protocol::{ApiEndpoint, HttpTransport};
/// use climactl_lib::session::{DeviceSession, SessionConfig};
/// use climactl_lib::types::{Brand, PowerState};
///
/// # async fn example() -> climactl_lib::Result<()> {
/// let config = SessionConfig::new(Brand::MitsubishiElectric, ApiEndpoint::new("192.168.1.40"));
/// let transport = HttpTransport::new(config.endpoint.clone())?;
/// let session = DeviceSession::new(DeviceId::new(), config, transport, EventBus::new())?;
///
/// session.start().await;
/// session.set_command(Command::Power(PowerState::On)).await?;
/// println!("{:?}", session.state());
///
/// session.delete();
/// # Ok(())
/// # }
/// ```
pub struct DeviceSession<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for DeviceSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for DeviceSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSession")
            .field("id", &self.inner.id)
            .field("brand", &self.inner.profile.brand)
            .field("running", &self.inner.poller.is_running())
            .field("deleted", &self.inner.deleted.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<T: Transport> DeviceSession<T> {
    /// Creates a stopped session with an empty capability set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        id: DeviceId,
        config: SessionConfig,
        transport: T,
        events: EventBus,
    ) -> Result<Self, Error> {
        Self::restore(id, config, transport, events, CapabilitySet::new())
    }

    /// Creates a stopped session that already exposes `capabilities`, e.g.
    /// after a process restart.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn restore(
        id: DeviceId,
        config: SessionConfig,
        transport: T,
        events: EventBus,
        capabilities: CapabilitySet,
    ) -> Result<Self, Error> {
        config.validate()?;
        config.endpoint.validate()?;

        let options = CapabilityOptions {
            target_temperature_step: config.temperature_step,
        };
        let (state_tx, _) = watch::channel(None);

        Ok(Self {
            inner: Arc::new(Inner {
                id,
                profile: config.profile(),
                transport,
                config: Mutex::new(config),
                published: Mutex::new(PublishedState::new()),
                state_tx,
                capabilities: Mutex::new(CapabilityState {
                    set: capabilities,
                    sensor: None,
                    options,
                }),
                cycle: tokio::sync::Mutex::new(()),
                poller: Poller::new(),
                deleted: AtomicBool::new(false),
                events,
            }),
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Runs a first status cycle and arms the poll timer.
    ///
    /// A failed first cycle is logged like any other; the timer is armed
    /// regardless and the brand's base capabilities are exposed. Calling
    /// `start` on a running session re-arms the timer. Does nothing once the
    /// session is deleted.
    pub async fn start(&self) {
        if self.is_deleted() {
            return;
        }

        tracing::info!(
            device_id = %self.inner.id,
            brand = %self.inner.profile.brand,
            endpoint = %self.inner.transport.endpoint(),
            "Starting session"
        );

        if self.inner.poll_and_log().await.is_err() {
            self.inner.reconcile(SensorPresence::Unknown);
        }

        self.arm();
    }

    fn arm(&self) {
        let interval = self.inner.config.lock().polling_interval();
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);

        self.inner.poller.start(interval, move || {
            let weak = Weak::clone(&weak);
            async move {
                if let Some(inner) = weak.upgrade() {
                    let _ = inner.poll_and_log().await;
                }
            }
        });

        // A concurrent delete may have run between the caller's check and
        // the start above.
        if self.is_deleted() {
            self.inner.poller.stop();
        }
    }

    /// Stops the poll timer. The session can be started again.
    pub fn stop(&self) -> bool {
        self.inner.poller.stop()
    }

    /// Deletes the session.
    ///
    /// The timer is cancelled before this returns; no status cycle starts
    /// afterwards and commands fail with [`Error::SessionDeleted`].
    /// Idempotent; returns `true` on the first call.
    pub fn delete(&self) -> bool {
        if self.inner.deleted.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.inner.poller.stop();
        tracing::info!(device_id = %self.inner.id, "Session deleted");
        true
    }

    /// Returns `true` once [`delete`](Self::delete) has been called.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.inner.deleted.load(Ordering::SeqCst)
    }

    /// Returns `true` if the poll timer is armed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.poller.is_running()
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Runs one status cycle now and reports its outcome.
    ///
    /// Waits for a cycle in progress to finish first. On failure the
    /// published state and capabilities are left untouched.
    ///
    /// # Errors
    ///
    /// Returns the transport, protocol or decode error of the cycle, or
    /// [`Error::SessionDeleted`].
    pub async fn poll_now(&self) -> Result<(), Error> {
        self.inner.run_cycle().await
    }

    /// Returns the last published state.
    #[must_use]
    pub fn state(&self) -> Option<ClimateState> {
        self.inner.published.lock().state().cloned()
    }

    /// Returns when the last published state was observed.
    #[must_use]
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.inner.published.lock().observed_at()
    }

    /// Returns a receiver that always holds the last published state.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<ClimateState>> {
        self.inner.state_tx.subscribe()
    }

    /// Returns the exposed capability set.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        self.inner.capabilities.lock().set.clone()
    }

    /// Returns the capability options.
    #[must_use]
    pub fn capability_options(&self) -> CapabilityOptions {
        self.inner.capabilities.lock().options
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Sends a command.
    ///
    /// On success the brand's echo policy runs: the change is mirrored into
    /// the published state, or a status cycle runs right away. On failure
    /// nothing is published. The poll timer is never affected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] if the command is invalid for the brand or
    /// the device did not accept it, and [`Error::SessionDeleted`] once the
    /// session is deleted.
    pub async fn set_command(&self, command: Command) -> Result<(), Error> {
        self.inner.ensure_live()?;

        let echo = command::dispatch(&self.inner.transport, &self.inner.profile, &command)
            .await
            .inspect_err(|e| {
                tracing::debug!(
                    device_id = %self.inner.id,
                    command = %command,
                    error = %e,
                    "Command failed"
                );
            })?;

        match echo {
            Echo::Mirror(change) => self.inner.mirror(change),
            Echo::Repoll => {
                // The write itself succeeded; a failed re-poll only delays the echo.
                if let Err(e) = self.inner.run_cycle().await {
                    tracing::warn!(device_id = %self.inner.id, error = %e, "Re-poll after command failed");
                    self.inner
                        .events
                        .publish(DeviceEvent::poll_failed(self.inner.id, &e));
                }
            }
        }

        Ok(())
    }

    /// Parses and sends a command given as kind and text.
    ///
    /// # Errors
    ///
    /// See [`set_command`](Self::set_command). Unparseable values are
    /// reported as [`CommandError::Malformed`].
    pub async fn set(&self, kind: CommandKind, value: &str) -> Result<(), Error> {
        let command = Command::parse(kind, value).map_err(CommandError::from)?;
        self.set_command(command).await
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Points the session at a new address.
    ///
    /// Polling cadence, capabilities and published state are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the session is deleted.
    pub fn rehome(&self, endpoint: ApiEndpoint) -> Result<(), Error> {
        self.inner.ensure_live()?;
        endpoint.validate()?;

        let previous = self.inner.transport.endpoint();
        if previous == endpoint {
            return Ok(());
        }

        tracing::info!(
            device_id = %self.inner.id,
            from = %previous,
            to = %endpoint,
            "Rehoming session"
        );
        self.inner.transport.rehome(endpoint.clone());
        self.inner.config.lock().endpoint = endpoint;
        Ok(())
    }

    /// Applies new user settings.
    ///
    /// A changed interval re-arms a running timer; a changed step only
    /// updates the target temperature options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] for invalid settings and
    /// [`Error::SessionDeleted`] once deleted.
    pub fn update_settings(&self, settings: SessionSettings) -> Result<(), Error> {
        self.inner.ensure_live()?;
        settings.validate()?;

        let (old_interval, new_interval, step) = {
            let mut config = self.inner.config.lock();
            let old = config.polling_interval();
            config.apply(&settings);
            (old, config.polling_interval(), config.temperature_step)
        };

        self.inner.capabilities.lock().options.target_temperature_step = step;

        if new_interval != old_interval && self.is_running() {
            tracing::info!(
                device_id = %self.inner.id,
                interval_secs = new_interval.as_secs(),
                "Polling interval changed"
            );
            self.inner.poller.stop();
            self.arm();
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the session identifier.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.inner.id
    }

    /// Returns the brand.
    #[must_use]
    pub fn brand(&self) -> Brand {
        self.inner.profile.brand
    }

    /// Returns the brand profile.
    #[must_use]
    pub fn profile(&self) -> &BrandProfile {
        &self.inner.profile
    }

    /// Returns the current endpoint.
    #[must_use]
    pub fn endpoint(&self) -> ApiEndpoint {
        self.inner.transport.endpoint()
    }

    /// Returns the configured polling interval.
    #[must_use]
    pub fn polling_interval(&self) -> Duration {
        self.inner.config.lock().polling_interval()
    }

    /// Returns the display name, falling back to the address.
    #[must_use]
    pub fn display_name(&self) -> String {
        let config = self.inner.config.lock();
        config
            .friendly_name
            .clone()
            .unwrap_or_else(|| config.endpoint.address().to_string())
    }

    /// Returns a snapshot of the configuration for persistence.
    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.inner.config.lock().clone()
    }
}

impl<T: Transport> Inner<T> {
    fn ensure_live(&self) -> Result<(), Error> {
        if self.deleted.load(Ordering::SeqCst) {
            Err(Error::SessionDeleted)
        } else {
            Ok(())
        }
    }

    async fn poll_and_log(&self) -> Result<(), Error> {
        let result = self.run_cycle().await;
        if let Err(e) = &result
            && !matches!(e, Error::SessionDeleted)
        {
            tracing::warn!(device_id = %self.id, error = %e, "Status cycle failed");
            self.events.publish(DeviceEvent::poll_failed(self.id, e));
        }
        result
    }

    /// Fetch, decode, reconcile, publish.
    async fn run_cycle(&self) -> Result<(), Error> {
        let _cycle = self.cycle.lock().await;
        self.ensure_live()?;

        let observed_at = Utc::now();
        let raw = self.transport.fetch_status().await?;
        let state = decode::decode_with_profile(&self.profile, &raw)?;

        self.ensure_live()?;
        self.reconcile(state.sensor);
        self.publish(state, observed_at, StateCause::Poll);
        Ok(())
    }

    fn reconcile(&self, sensor: SensorPresence) {
        let mut caps = self.capabilities.lock();

        // Only an explicit presence report changes our belief about the sensor.
        let known = sensor.known().or(caps.sensor);
        caps.sensor = known;
        let present = known.unwrap_or_else(|| caps.set.has_sensor_capabilities());

        let delta = capabilities::reconcile(&caps.set, self.profile.brand, present);
        if delta.is_empty() {
            return;
        }
        caps.set.apply(&delta);

        tracing::info!(
            device_id = %self.id,
            added = ?delta.to_add,
            removed = ?delta.to_remove,
            "Capabilities changed"
        );
        self.events.publish(DeviceEvent::capabilities_changed(
            self.id,
            delta.to_add,
            delta.to_remove,
        ));
    }

    fn mirror(&self, change: StateChange) {
        let mut published = self.published.lock();
        let Some(mut state) = published.state().cloned() else {
            tracing::debug!(device_id = %self.id, "Nothing published yet, skipping mirror");
            return;
        };
        if !state.apply(&change) {
            return;
        }
        if published.offer(state.clone(), Utc::now()) {
            self.state_tx.send_replace(Some(state.clone()));
            self.events.publish(DeviceEvent::state_changed(
                self.id,
                StateCause::Command(change),
                state,
            ));
        }
    }

    fn publish(&self, state: ClimateState, at: DateTime<Utc>, cause: StateCause) {
        let mut published = self.published.lock();
        if !published.offer(state.clone(), at) {
            tracing::debug!(device_id = %self.id, "Dropping stale status");
            return;
        }
        self.state_tx.send_replace(Some(state.clone()));
        self.events
            .publish(DeviceEvent::state_changed(self.id, cause, state));
    }
}

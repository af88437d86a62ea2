// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status polling.
//!
//! A [`Poller`] owns at most one background task. The task waits one
//! interval, runs the cycle closure to completion, and repeats. Because the
//! next tick is only awaited after the previous cycle returned, cycles from one
//! poller never overlap; ticks missed while a cycle was slow are delayed, not
//! burst.
//!
//! [`Poller::start`] always cancels a running task before spawning the new
//! one, and [`Poller::stop`] returns only after the task has been told to stop
//! and aborted, so there is never more than one live timer per poller.
//!
//! # Examples
//!
//! ```
//! use climactl_lib::poller::Poller;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let poller = Poller::new();
//! poller.start(Duration::from_secs(60), || async {
//!     // fetch, decode, reconcile, publish
//! });
//! assert!(poller.is_running());
//!
//! poller.stop();
//! assert!(!poller.is_running());
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Observable state of a [`Poller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// No timer is armed.
    Stopped,
    /// A timer is armed with this interval.
    Running {
        /// Time between two cycles.
        interval: Duration,
    },
}

#[derive(Debug)]
struct Armed {
    interval: Duration,
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Armed {
    fn cancel(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.handle.abort();
    }
}

/// Owner of one periodic polling task.
#[derive(Debug, Default)]
pub struct Poller {
    armed: Mutex<Option<Armed>>,
}

impl Poller {
    /// Creates a stopped poller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer, replacing any running one.
    ///
    /// The first cycle runs one `interval` after this call. Must be called
    /// from within a Tokio runtime.
    pub fn start<F, Fut>(&self, interval: Duration, cycle: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut armed = self.armed.lock();
        if let Some(previous) = armed.take() {
            previous.cancel();
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                cycle().await;
            }
        });

        tracing::debug!(interval_secs = interval.as_secs(), "Poller started");

        *armed = Some(Armed {
            interval,
            cancelled,
            handle,
        });
    }

    /// Cancels the timer. Idempotent.
    ///
    /// Returns `true` if a timer was running.
    pub fn stop(&self) -> bool {
        match self.armed.lock().take() {
            Some(armed) => {
                armed.cancel();
                tracing::debug!("Poller stopped");
                true
            }
            None => false,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> PollerState {
        match self.armed.lock().as_ref() {
            Some(armed) => PollerState::Running {
                interval: armed.interval,
            },
            None => PollerState::Stopped,
        }
    }

    /// Returns `true` if a timer is armed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.armed.lock().is_some()
    }

    /// Returns the interval of the armed timer.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.armed.lock().as_ref().map(|armed| armed.interval)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(armed) = self.armed.get_mut().take() {
            armed.cancel();
        }
    }
}

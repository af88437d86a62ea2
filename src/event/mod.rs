// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events published by sessions.
//!
//! Every session publishes on a shared [`EventBus`]: lifecycle (added,
//! removed), every newly published [`ClimateState`](crate::state::ClimateState),
//! every applied capability delta and every suppressed poll failure.
//! Subscribers that only care about the latest state of one session should
//! use [`DeviceSession::watch`](crate::session::DeviceSession::watch) instead.
//!
//! # Examples
//!
//! ```
//! use climactl_lib::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let device_id = DeviceId::new();
//! bus.publish(DeviceEvent::session_added(device_id));
//!
//! let event = rx.try_recv().unwrap();
//! assert_eq!(event.device_id(), device_id);
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::{DeviceEvent, StateCause};
pub use device_id::DeviceId;
pub use event_bus::EventBus;

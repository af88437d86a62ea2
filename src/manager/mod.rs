// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of device sessions.
//!
//! The [`SessionManager`] owns every session of a process, keyed by
//! [`DeviceId`](crate::event::DeviceId), and forwards host operations (add,
//! remove, command, rehome, settings) to the right one. All sessions publish
//! on the manager's event bus.
//!
//! # Examples
//!
//! ```no_run
//! use climactl_lib::command::Command;
//! use climactl_lib::event::DeviceEvent;
//! use climactl_lib::manager::SessionManager;
//! use climactl_lib::protocol::{ApiEndpoint, HttpTransport};
//! use climactl_lib::session::SessionConfig;
//! use climactl_lib::types::{Brand, PowerState};
//!
//! #[tokio::main]
//! async fn main() -> climactl_lib::Result<()> {
//!     let manager = SessionManager::<HttpTransport>::new();
//!
//!     let mut events = manager.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             if let DeviceEvent::StateChanged { device_id, state, .. } = event {
//!                 println!("{device_id}: {:.1} °C", state.measured_temperature);
//!             }
//!         }
//!     });
//!
//!     let config = SessionConfig::new(Brand::MitsubishiElectric, ApiEndpoint::new("192.168.1.40"))
//!         .with_friendly_name("Living room");
//!     let id = manager.add_http_session(config).await?;
//!
//!     manager.set_command(id, Command::Power(PowerState::On)).await?;
//!     manager.remove_session(id).await;
//!     Ok(())
//! }
//! ```

mod session_manager;

pub use session_manager::SessionManager;

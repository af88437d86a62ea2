// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `climactl` Lib - A Rust library to poll and control heat-pump controllers.
//!
//! This library talks to small Wi-Fi controllers fitted to split-unit heat
//! pumps. Every controller exposes the same local HTTP API (`GET` a JSON
//! status document, `GET` with a query string to change one setting), but
//! the JSON layout, field names and allowed values differ per firmware
//! family.
//!
//! # Supported Brands
//!
//! - Mitsubishi Electric
//! - Mitsubishi Heavy Industries
//! - LG
//! - Generic (legacy firmware, decoded like Mitsubishi Electric)
//!
//! # Supported Features
//!
//! - **Polling**: One timer per unit, at most one status cycle in flight
//! - **Control**: Power, target temperature, operating mode, fan and vanes,
//!   remote room temperature
//! - **Capabilities**: A per-unit capability set that follows the optional
//!   remote thermometer as it comes and goes
//! - **Events**: A broadcast stream of state, capability and lifecycle changes
//!
//! # Quick Start
//!
//! ```no_run
//! use climactl_lib::command::Command;
//! use climactl_lib::protocol::ApiEndpoint;
//! use climactl_lib::types::{Brand, PowerState};
//! use climactl_lib::{HttpTransport, SessionConfig, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> climactl_lib::Result<()> {
//!     let manager = SessionManager::<HttpTransport>::new();
//!
//!     let config = SessionConfig::new(Brand::Lg, ApiEndpoint::new("192.168.1.42"))
//!         .with_polling_interval_minutes(2);
//!     let id = manager.add_http_session(config).await?;
//!
//!     manager.set_command(id, Command::TargetTemperature(21.5)).await?;
//!     manager.set_command(id, Command::Power(PowerState::On)).await?;
//!
//!     if let Some(state) = manager.state(id).await {
//!         println!("{} in {} mode", state.measured_temperature, state.mode);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Decoding Without a Session
//!
//! ```
//! use climactl_lib::decode::{decode, RawStatus};
//! use climactl_lib::types::Brand;
//!
//! let raw = RawStatus::from_json(
//!     r#"{"heatpump": {"power": "on", "mode": "heat", "set_temperature": 21}}"#,
//! )?;
//! let state = decode(Brand::Lg, &raw)?;
//! assert!(state.power);
//! # Ok::<(), climactl_lib::error::DecodeError>(())
//! ```

pub mod capabilities;
pub mod command;
pub mod decode;
pub mod error;
pub mod event;
pub mod manager;
pub mod poller;
pub mod profile;
pub mod protocol;
pub mod session;
pub mod state;
pub mod types;

pub use capabilities::{CapabilityDelta, CapabilityOptions, CapabilitySet};
pub use command::Command;
pub use error::{
    CommandError, CommandErrorKind, DecodeError, Error, ProtocolError, Result, StatusError,
    TransportError, ValueError,
};
pub use event::{DeviceEvent, DeviceId, EventBus, StateCause};
pub use manager::SessionManager;
pub use profile::BrandProfile;
pub use protocol::{ApiEndpoint, Transport};
#[cfg(feature = "http")]
pub use protocol::{HttpConfig, HttpTransport};
pub use session::{DeviceSession, SessionConfig, SessionSettings};
pub use state::{ClimateState, SensorPresence, StateChange};
pub use types::{Brand, CommandKind, PowerState};

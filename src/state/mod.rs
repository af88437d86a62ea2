// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized climate state.
//!
//! [`ClimateState`] is the brand-independent record produced by the status
//! decoder. [`StateChange`] describes the effect of a successful command so
//! it can be mirrored locally, and [`PublishedState`] holds the last value a
//! session made visible together with the wall-clock time it was observed.
//!
//! # Examples
//!
//! ```
//! use climactl_lib::state::{ClimateState, StateChange};
//!
//! let mut state = ClimateState::default();
//! assert!(state.apply(&StateChange::Power(true)));
//! assert!(!state.apply(&StateChange::Power(true)));
//! assert!(state.power);
//! ```

mod climate_state;
mod published;
mod state_change;

pub use climate_state::{ClimateState, SensorPresence};
pub use published::PublishedState;
pub use state_change::StateChange;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared across the library.
//!
//! # Types
//!
//! - [`Brand`] - Controller firmware family (Mitsubishi Electric, MHI, LG, legacy)
//! - [`PowerState`] - On/Off as spelled on the wire
//! - [`CommandKind`] - Logical name of a writable control point

mod brand;
mod command_kind;
mod power;

pub use brand::Brand;
pub use command_kind::CommandKind;
pub use power::PowerState;

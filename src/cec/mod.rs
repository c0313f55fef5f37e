// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller for the HDMI-CEC bus.
//!
//! [`CecBusController`] owns exactly one session on the bus, opened at
//! construction through the first adapter the bus library discovers, with
//! this service registered as a playback-type active source. System sleep
//! silently invalidates the session handle, so a power-on request always
//! closes and reopens the session before touching the bus.
//!
//! [`TvDevice`] is the thin facade most callers want: the controller
//! pinned to the television's logical address.

mod bus;
mod hooks;
mod tv;

pub use bus::{CecBusController, CecConfig};
pub use hooks::{CecHooks, TracingHooks};
pub use tv::TvDevice;

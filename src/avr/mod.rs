// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client for the receiver's TCP control protocol.
//!
//! The receiver speaks a line-oriented ASCII protocol on its control port
//! (default 23): one command per line, newline-terminated. Query commands
//! are answered with a single reply line; power on/off are fire-and-forget.
//!
//! | Action | Wire command | Expected reply |
//! |--------|--------------|----------------|
//! | Query power | `?P` | `PWR0` (on) / `PWR1` (off) |
//! | Power on | `PO` | none read |
//! | Power off | `PF` | none read |
//!
//! [`AvrClient`] keeps one long-lived connection, gated on a shared
//! [`NetworkStatus`] signal, and reconnects once on the first failed
//! socket operation.

mod client;
mod command;
mod net;

pub use client::{AvrClient, AvrConfig};
pub use net::NetworkStatus;

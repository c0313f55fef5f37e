// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification hooks for the CEC bus session.

use cec_rs::{CecCommand, CecKeypress, CecLogLevel, CecLogMessage};

/// Receiver for the bus library's notification callbacks.
///
/// The bus session emits three kinds of notifications: log messages,
/// received commands and remote-control keypresses. All hook points
/// default to no-ops; implement only what you need. Hooks are invoked
/// from the bus library's own threads, hence `Send + Sync`.
pub trait CecHooks: Send + Sync {
    /// Called for every log message the bus library emits.
    fn on_log_message(&self, _message: CecLogMessage) {}

    /// Called for every CEC command addressed to this service.
    fn on_command(&self, _command: CecCommand) {}

    /// Called for every remote-control keypress seen on the bus.
    fn on_key_press(&self, _keypress: CecKeypress) {}
}

/// Default hooks: bus log messages are bridged to `tracing` at matching
/// levels; command and keypress notifications are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl CecHooks for TracingHooks {
    fn on_log_message(&self, message: CecLogMessage) {
        match message.level {
            CecLogLevel::Error => tracing::error!(target: "wakesync::cec", "{}", message.message),
            CecLogLevel::Warning => tracing::warn!(target: "wakesync::cec", "{}", message.message),
            CecLogLevel::Notice => tracing::info!(target: "wakesync::cec", "{}", message.message),
            CecLogLevel::Traffic => tracing::trace!(target: "wakesync::cec", "{}", message.message),
            _ => tracing::debug!(target: "wakesync::cec", "{}", message.message),
        }
    }
}

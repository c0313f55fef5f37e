// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session owner for the CEC bus.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cec_rs::{
    CecConnection, CecConnectionCfgBuilder, CecConnectionResultError, CecDeviceType,
    CecDeviceTypeVec, CecLogicalAddress, CecPowerStatus,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cec::hooks::{CecHooks, TracingHooks};
use crate::error::{CecError, Result};
use crate::types::PowerState;

/// Configuration for the CEC bus session.
///
/// Adapter selection is by enumeration: the first adapter the bus library
/// discovers is used, and construction fails if there is none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CecConfig {
    device_name: String,
    open_timeout: Duration,
}

impl CecConfig {
    /// Default on-screen name this service registers on the bus.
    pub const DEFAULT_DEVICE_NAME: &'static str = "wakesync";
    /// Default bound for opening a session on the adapter.
    pub const DEFAULT_OPEN_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with the default name and timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            device_name: Self::DEFAULT_DEVICE_NAME.to_string(),
            open_timeout: Self::DEFAULT_OPEN_TIMEOUT,
        }
    }

    /// Sets the on-screen device name registered on the bus.
    #[must_use]
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Sets the session-open timeout.
    #[must_use]
    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }

    /// Returns the on-screen device name.
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Returns the session-open timeout.
    #[must_use]
    pub fn open_timeout(&self) -> Duration {
        self.open_timeout
    }
}

impl Default for CecConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of one session on the CEC hardware bus.
///
/// Construction discovers the adapter, opens the session and registers
/// this service as a playback-type active source; any failure there is
/// fatal — a controller is never partially usable. Operations against a
/// device that is not ready on the bus degrade to
/// [`PowerState::Unknown`] instead of failing.
pub struct CecBusController {
    config: CecConfig,
    hooks: Arc<dyn CecHooks>,
    session: Mutex<Option<CecConnection>>,
}

impl CecBusController {
    /// Opens a bus session with the default [`TracingHooks`].
    ///
    /// # Errors
    ///
    /// Returns a [`CecError`] if no adapter is found, the session cannot
    /// be opened, or active-source registration fails.
    pub fn new(config: CecConfig) -> Result<Self> {
        Self::with_hooks(config, Arc::new(TracingHooks))
    }

    /// Opens a bus session delivering bus notifications to `hooks`.
    ///
    /// # Errors
    ///
    /// Returns a [`CecError`] if no adapter is found, the session cannot
    /// be opened, or active-source registration fails.
    pub fn with_hooks(config: CecConfig, hooks: Arc<dyn CecHooks>) -> Result<Self> {
        let session = open_session(&config, &hooks)?;
        tracing::info!(device_name = %config.device_name(), "CEC bus session open");
        Ok(Self {
            config,
            hooks,
            session: Mutex::new(Some(session)),
        })
    }

    /// Switches `device` to the requested power state.
    ///
    /// Standby is issued on the current session, only if the device is
    /// ready; the result is `Off` on success and `Unknown` otherwise.
    ///
    /// Power-on assumes the session handle was invalidated by system
    /// sleep: the session is unconditionally closed and reopened — with
    /// active-source re-registration — before readiness is checked or the
    /// command issued. The result is `On` on success and `Unknown` if the
    /// device was not ready or did not take the command.
    ///
    /// Requesting `Unknown` is a no-op answering `Unknown`.
    ///
    /// # Errors
    ///
    /// Returns a [`CecError`] only when the session reopen for a power-on
    /// fails: without a session no later bus operation can succeed, so
    /// that failure is not degraded to `Unknown`.
    pub fn switch_device_power_state(
        &self,
        device: CecLogicalAddress,
        requested: PowerState,
    ) -> Result<PowerState> {
        let mut session = self.session.lock();
        match requested {
            PowerState::Off => {
                if let Some(conn) = session.as_ref() {
                    if is_ready(conn, device) && conn.send_standby_devices(device).is_ok() {
                        return Ok(PowerState::Off);
                    }
                }
                tracing::debug!(device = ?device, "standby not delivered, state unknown");
                Ok(PowerState::Unknown)
            }
            PowerState::On => {
                // Sleep drops the handle silently; never operate on a
                // stale one.
                *session = None;
                let conn = open_session(&self.config, &self.hooks)?;
                tracing::debug!(device = ?device, "CEC session reopened for power-on");
                let state = if is_ready(&conn, device) && conn.send_power_on_devices(device).is_ok()
                {
                    PowerState::On
                } else {
                    tracing::debug!(device = ?device, "power-on not delivered, state unknown");
                    PowerState::Unknown
                };
                *session = Some(conn);
                Ok(state)
            }
            PowerState::Unknown => Ok(PowerState::Unknown),
        }
    }

    /// Queries the power state of `device` on the bus.
    ///
    /// A device that is not ready — not listed as active or not answering
    /// a poll — answers [`PowerState::Unknown`] without error.
    #[must_use]
    pub fn device_power_state(&self, device: CecLogicalAddress) -> PowerState {
        let session = self.session.lock();
        match session.as_ref() {
            Some(conn) if is_ready(conn, device) => {
                map_power_status(conn.get_device_power_status(device))
            }
            _ => PowerState::Unknown,
        }
    }

    /// Closes the bus session. Repeated calls are a no-op.
    pub fn close(&self) {
        if self.session.lock().take().is_some() {
            tracing::debug!("CEC bus session closed");
        }
    }
}

impl Drop for CecBusController {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for CecBusController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CecBusController")
            .field("device_name", &self.config.device_name())
            .field("session_open", &self.session.lock().is_some())
            .finish_non_exhaustive()
    }
}

/// A device is ready only if the bus lists it as active *and* it answers
/// a poll.
fn is_ready(conn: &CecConnection, device: CecLogicalAddress) -> bool {
    conn.is_active_device(device) && conn.poll_device(device)
}

fn map_power_status(status: CecPowerStatus) -> PowerState {
    match status {
        CecPowerStatus::On => PowerState::On,
        CecPowerStatus::Standby => PowerState::Off,
        _ => PowerState::Unknown,
    }
}

/// Discovers the first adapter, opens a session on it and registers this
/// service as the active playback source.
fn open_session(
    config: &CecConfig,
    hooks: &Arc<dyn CecHooks>,
) -> std::result::Result<CecConnection, CecError> {
    let log_hooks = Arc::clone(hooks);
    let command_hooks = Arc::clone(hooks);
    let key_hooks = Arc::clone(hooks);

    let cfg = CecConnectionCfgBuilder::default()
        .device_name(config.device_name().to_string())
        .device_types(CecDeviceTypeVec::new(CecDeviceType::PlaybackDevice))
        .activate_source(false)
        .open_timeout(config.open_timeout())
        .log_message_callback(Box::new(move |message| log_hooks.on_log_message(message)))
        .command_received_callback(Box::new(move |command| command_hooks.on_command(command)))
        .key_press_callback(Box::new(move |keypress| key_hooks.on_key_press(keypress)))
        .build()
        .map_err(|err| CecError::Config(err.to_string()))?;

    let connection = cfg.open().map_err(|err| match err {
        CecConnectionResultError::NoAdapterFound => CecError::NoAdapter,
        other => CecError::SessionOpen(other),
    })?;

    connection
        .set_active_source(CecDeviceType::PlaybackDevice)
        .map_err(CecError::ActivateSource)?;

    Ok(connection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = CecConfig::default();
        assert_eq!(config.device_name(), "wakesync");
        assert_eq!(config.open_timeout(), CecConfig::DEFAULT_OPEN_TIMEOUT);
    }

    #[test]
    fn config_builders() {
        let config = CecConfig::new()
            .with_device_name("htpc")
            .with_open_timeout(Duration::from_secs(3));
        assert_eq!(config.device_name(), "htpc");
        assert_eq!(config.open_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn power_status_mapping() {
        assert_eq!(map_power_status(CecPowerStatus::On), PowerState::On);
        assert_eq!(map_power_status(CecPowerStatus::Standby), PowerState::Off);
        assert_eq!(
            map_power_status(CecPowerStatus::InTransitionStandbyToOn),
            PowerState::Unknown
        );
        assert_eq!(
            map_power_status(CecPowerStatus::Unknown),
            PowerState::Unknown
        );
    }
}

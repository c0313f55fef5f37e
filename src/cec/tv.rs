// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The television, as seen from the CEC bus.

use std::sync::Arc;

use cec_rs::CecLogicalAddress;

use crate::cec::bus::{CecBusController, CecConfig};
use crate::cec::hooks::CecHooks;
use crate::device::PowerControl;
use crate::error::Result;
use crate::types::PowerState;

/// The television on the CEC bus.
///
/// A thin facade over a [`CecBusController`] pinned to the TV's logical
/// address. The device owns its controller; dropping the device closes
/// the bus session.
///
/// # Examples
///
/// ```no_run
/// use wakesync::{CecConfig, TvDevice};
///
/// # fn example() -> wakesync::Result<()> {
/// let tv = TvDevice::new(CecConfig::default())?;
/// let state = tv.power_status();
/// println!("tv is {state}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TvDevice {
    bus: CecBusController,
}

impl TvDevice {
    /// Logical bus address of the television.
    pub const ADDRESS: CecLogicalAddress = CecLogicalAddress::Tv;

    /// Connects to the CEC bus and takes ownership of the session.
    ///
    /// # Errors
    ///
    /// Returns a [`CecError`](crate::CecError) if the bus session cannot
    /// be established; see [`CecBusController::new`].
    pub fn new(config: CecConfig) -> Result<Self> {
        Ok(Self {
            bus: CecBusController::new(config)?,
        })
    }

    /// Like [`new`](Self::new), delivering bus notifications to `hooks`.
    ///
    /// # Errors
    ///
    /// Returns a [`CecError`](crate::CecError) if the bus session cannot
    /// be established.
    pub fn with_hooks(config: CecConfig, hooks: Arc<dyn CecHooks>) -> Result<Self> {
        Ok(Self {
            bus: CecBusController::with_hooks(config, hooks)?,
        })
    }

    /// Switches the TV on, reopening the bus session first.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session reopen fails; an unready TV
    /// yields `Ok(PowerState::Unknown)`.
    pub fn power_on(&self) -> Result<PowerState> {
        self.bus
            .switch_device_power_state(Self::ADDRESS, PowerState::On)
    }

    /// Puts the TV into standby.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; an unready TV yields
    /// `Ok(PowerState::Unknown)`.
    pub fn power_off(&self) -> Result<PowerState> {
        self.bus
            .switch_device_power_state(Self::ADDRESS, PowerState::Off)
    }

    /// Queries the TV's power state; `Unknown` if the TV is not ready on
    /// the bus.
    #[must_use]
    pub fn power_status(&self) -> PowerState {
        self.bus.device_power_state(Self::ADDRESS)
    }

    /// Returns the bus controller the TV is managed by.
    #[must_use]
    pub fn bus(&self) -> &CecBusController {
        &self.bus
    }

    /// Closes the underlying bus session. Repeated calls are a no-op.
    pub fn close(&self) {
        self.bus.close();
    }
}

impl PowerControl for TvDevice {
    // Bus operations are synchronous library calls bounded by the bus
    // timeouts; they complete on the calling thread.
    async fn power_on(&self) -> Result<()> {
        TvDevice::power_on(self).map(|_| ())
    }

    async fn power_off(&self) -> Result<()> {
        TvDevice::power_off(self).map(|_| ())
    }

    async fn power_status(&self) -> Result<PowerState> {
        Ok(TvDevice::power_status(self))
    }

    async fn shutdown(&self) {
        self.close();
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The orchestrator's device seam: a uniform power-control trait and an
//! explicit present/absent slot for each managed device.

use crate::error::Result;
use crate::types::PowerState;

/// Uniform power-control surface the orchestrator drives.
///
/// Implemented by [`AvrClient`](crate::AvrClient) and
/// [`TvDevice`](crate::TvDevice); test doubles implement it to exercise
/// the orchestrator without hardware on the bench.
#[allow(async_fn_in_trait)]
pub trait PowerControl {
    /// Powers the device on.
    ///
    /// # Errors
    ///
    /// Returns a device error if the command could not be delivered.
    async fn power_on(&self) -> Result<()>;

    /// Powers the device off.
    ///
    /// # Errors
    ///
    /// Returns a device error if the command could not be delivered.
    async fn power_off(&self) -> Result<()>;

    /// Queries the device's power state.
    ///
    /// # Errors
    ///
    /// Returns a device error if the query could not be delivered;
    /// a delivered query with no conclusive answer is
    /// `Ok(PowerState::Unknown)`.
    async fn power_status(&self) -> Result<PowerState>;

    /// Releases held resources. Idempotent; defaults to a no-op.
    async fn shutdown(&self) {}
}

/// A managed device that may not be available.
///
/// Each slot is decided once at startup — a device whose construction
/// failed is `Absent` with the failure's description and is never
/// resurrected for the service's lifetime. Callers skip absent slots;
/// nothing about an absent device can fail later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSlot<T> {
    /// The device was constructed and is usable.
    Present(T),
    /// The device could not be constructed.
    Absent {
        /// Why construction failed.
        reason: String,
    },
}

impl<T> DeviceSlot<T> {
    /// Creates an absent slot with the given reason.
    #[must_use]
    pub fn absent(reason: impl Into<String>) -> Self {
        Self::Absent {
            reason: reason.into(),
        }
    }

    /// Builds a slot from a construction attempt.
    #[must_use]
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(device) => Self::Present(device),
            Err(err) => Self::absent(err.to_string()),
        }
    }

    /// Returns the device if present.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Present(device) => Some(device),
            Self::Absent { .. } => None,
        }
    }

    /// Returns `true` if the device is present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the absence reason, if the device is absent.
    #[must_use]
    pub fn absent_reason(&self) -> Option<&str> {
        match self {
            Self::Present(_) => None,
            Self::Absent { reason } => Some(reason),
        }
    }
}

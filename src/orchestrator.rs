// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Suspend/resume orchestration across the managed devices.
//!
//! The host delivers suspend and resume notifications on threads it owns;
//! the orchestrator runs the whole device sequence on the calling thread
//! and returns before the host expects the notification handler back. One
//! device's failure never reaches the other, and the wake sequence runs
//! exactly once per suspend episode no matter how many resume
//! notifications race in.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::avr::{AvrClient, AvrConfig, NetworkStatus};
use crate::cec::{CecConfig, TvDevice};
use crate::device::{DeviceSlot, PowerControl};

/// The two resume notifications a host may deliver.
///
/// The kinds are delivered independently and may arrive concurrently on
/// separate notification threads; the orchestrator collapses them into a
/// single wake sequence per suspend episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeKind {
    /// Resume caused by user interaction.
    Manual,
    /// Unattended resume (wake timer, wake-on-LAN, scheduled task).
    Automatic,
}

/// Drives both managed devices through the host's power transitions.
///
/// Holds one [`DeviceSlot`] per device and a resume guard. Each slot is
/// decided at startup: a device whose construction failed degrades to
/// absent — reported, never fatal — and the other device stays fully
/// usable.
///
/// # Examples
///
/// ```no_run
/// use wakesync::{AvrConfig, CecConfig, NetworkStatus, PowerOrchestrator, ResumeKind};
///
/// # async fn example() {
/// let orchestrator = PowerOrchestrator::start(
///     AvrConfig::new("avr.lan"),
///     NetworkStatus::default(),
///     CecConfig::default(),
/// )
/// .await;
///
/// // wired to the host's power notifications:
/// orchestrator.on_suspend().await;
/// orchestrator.on_resume(ResumeKind::Manual).await;
/// # }
/// ```
pub struct PowerOrchestrator<A = AvrClient, T = TvDevice> {
    avr: DeviceSlot<A>,
    tv: DeviceSlot<T>,
    /// True while a wake sequence is running or has completed for the
    /// current suspend episode.
    resumed: AtomicBool,
}

impl PowerOrchestrator {
    /// Constructs both devices independently and assembles the
    /// orchestrator.
    ///
    /// A construction failure for either device degrades that slot to
    /// absent and is reported; it never aborts startup.
    pub async fn start(
        avr_config: AvrConfig,
        network: NetworkStatus,
        cec_config: CecConfig,
    ) -> Self {
        let avr = match AvrClient::new(avr_config, network).await {
            Ok(client) => {
                tracing::info!(host = %client.host(), port = client.port(), "receiver attached");
                DeviceSlot::Present(client)
            }
            Err(err) => {
                tracing::warn!(error = %err, "receiver unavailable, continuing without it");
                DeviceSlot::absent(err.to_string())
            }
        };

        let tv = match TvDevice::new(cec_config) {
            Ok(tv) => {
                tracing::info!("tv attached");
                DeviceSlot::Present(tv)
            }
            Err(err) => {
                tracing::warn!(error = %err, "tv unavailable, continuing without it");
                DeviceSlot::absent(err.to_string())
            }
        };

        Self::new(avr, tv)
    }
}

impl<A: PowerControl, T: PowerControl> PowerOrchestrator<A, T> {
    /// Assembles an orchestrator from already-decided device slots.
    #[must_use]
    pub fn new(avr: DeviceSlot<A>, tv: DeviceSlot<T>) -> Self {
        Self {
            avr,
            tv,
            resumed: AtomicBool::new(false),
        }
    }

    /// Returns the receiver slot.
    #[must_use]
    pub fn avr(&self) -> &DeviceSlot<A> {
        &self.avr
    }

    /// Returns the television slot.
    #[must_use]
    pub fn tv(&self) -> &DeviceSlot<T> {
        &self.tv
    }

    /// The host is about to suspend: switch the TV off, then the
    /// receiver.
    ///
    /// Opens a new suspend episode, re-arming the resume guard. Each
    /// device's failure is reported and isolated — a failing TV never
    /// prevents the receiver power-off, and vice versa.
    pub async fn on_suspend(&self) {
        self.resumed.store(false, Ordering::SeqCst);
        tracing::info!("host suspending, switching devices off");

        if let Some(tv) = self.tv.get() {
            if let Err(err) = tv.power_off().await {
                tracing::error!(error = %err, "powering off tv failed");
            }
        }
        if let Some(avr) = self.avr.get() {
            if let Err(err) = avr.power_off().await {
                tracing::error!(error = %err, "powering off receiver failed");
            }
        }
    }

    /// The host resumed: switch the TV on, then the receiver.
    ///
    /// The two resume kinds may race on separate notification threads;
    /// an atomic compare-and-set on the resume guard lets exactly one of
    /// them run the wake sequence for this episode. The losers return
    /// immediately — no lock, no stalled notification thread. Failures
    /// are isolated per device as in [`on_suspend`](Self::on_suspend).
    pub async fn on_resume(&self, kind: ResumeKind) {
        if self
            .resumed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(kind = ?kind, "wake already handled for this episode");
            return;
        }
        tracing::info!(kind = ?kind, "host resumed, switching devices on");

        if let Some(tv) = self.tv.get() {
            if let Err(err) = tv.power_on().await {
                tracing::error!(error = %err, "powering on tv failed");
            }
        }
        if let Some(avr) = self.avr.get() {
            if let Err(err) = avr.power_on().await {
                tracing::error!(error = %err, "powering on receiver failed");
            }
        }
    }

    /// Service teardown: shuts both devices down, in no particular
    /// order. Repeated calls are a no-op.
    pub async fn on_stop(&self) {
        if let Some(tv) = self.tv.get() {
            tv.shutdown().await;
        }
        if let Some(avr) = self.avr.get() {
            avr.shutdown().await;
        }
        tracing::info!("orchestrator stopped");
    }
}

impl<A, T> std::fmt::Debug for PowerOrchestrator<A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerOrchestrator")
            .field("avr_present", &self.avr.is_present())
            .field("tv_present", &self.tv.is_present())
            .field("resumed", &self.resumed.load(Ordering::SeqCst))
            .finish()
    }
}

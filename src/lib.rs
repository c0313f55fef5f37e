// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! wakesync - Keep home-theater devices in step with the host's power
//! state.
//!
//! A home-theater PC is rarely alone: an A/V receiver sits on the network
//! with a telnet-style control port, and a television hangs off the HDMI
//! bus. This library powers both down when the host suspends and back up
//! when it resumes.
//!
//! # Components
//!
//! - [`AvrClient`]: line-oriented TCP control protocol of the receiver
//!   (power on/off/query), gated on a [`NetworkStatus`] reachability
//!   signal.
//! - [`TvDevice`] / [`CecBusController`]: a session on the HDMI-CEC bus,
//!   with the session-reopen dance that system sleep makes necessary.
//! - [`PowerOrchestrator`]: reacts to the host's suspend/resume
//!   notifications, isolates per-device failures and collapses racing
//!   resume notifications into one wake sequence per suspend episode.
//!
//! The HTTP control surface, OS service registration and configuration
//! loading live in the embedding service, not here.
//!
//! # Quick Start
//!
//! ```no_run
//! use wakesync::{AvrConfig, CecConfig, NetworkStatus, PowerOrchestrator, ResumeKind};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Flip this from the OS network-change notification.
//!     let network = NetworkStatus::default();
//!
//!     let orchestrator = PowerOrchestrator::start(
//!         AvrConfig::new("avr.lan"),
//!         network.clone(),
//!         CecConfig::default(),
//!     )
//!     .await;
//!
//!     // Wire these to the host's power notifications:
//!     orchestrator.on_suspend().await;
//!     orchestrator.on_resume(ResumeKind::Manual).await;
//!     orchestrator.on_stop().await;
//! }
//! ```
//!
//! # Driving a single device
//!
//! ```no_run
//! use wakesync::{AvrClient, AvrConfig, NetworkStatus};
//!
//! # async fn example() -> wakesync::Result<()> {
//! let avr = AvrClient::new(AvrConfig::new("avr.lan"), NetworkStatus::default()).await?;
//! avr.power_on().await?;
//! println!("receiver: {}", avr.power_status().await?);
//! # Ok(())
//! # }
//! ```

pub mod avr;
pub mod cec;
pub mod device;
pub mod error;
mod orchestrator;
mod types;

pub use avr::{AvrClient, AvrConfig, NetworkStatus};
pub use cec::{CecBusController, CecConfig, CecHooks, TracingHooks, TvDevice};
pub use device::{DeviceSlot, PowerControl};
pub use error::{CecError, ConnectivityError, Error, ParsePowerStateError, Result};
pub use orchestrator::{PowerOrchestrator, ResumeKind};
pub use types::PowerState;

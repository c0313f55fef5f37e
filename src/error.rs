// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the wakesync library.
//!
//! Two failure domains exist: the receiver's network link
//! ([`ConnectivityError`]) and the CEC bus session ([`CecError`]).
//! Per-operation bus failures on an unready or unresponsive device are not
//! errors at all — they degrade to [`PowerState::Unknown`](crate::PowerState).

use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reaching or talking to the receiver.
    #[error("avr: {0}")]
    Avr(#[from] ConnectivityError),

    /// Failure initializing or reopening the CEC bus session.
    #[error("cec: {0}")]
    Cec(#[from] CecError),
}

/// Failure on the receiver's network link.
///
/// Every network-layer failure — resolution, socket, I/O, timeout — is
/// normalized into this one kind, carrying its root cause. The client never
/// retries implicitly beyond its documented single reconnect attempt;
/// retry/backoff policy belongs to the caller.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    /// The network-reachability signal stayed unset for the whole timeout.
    /// No socket call was attempted.
    #[error("network unavailable after {}ms", .waited.as_millis())]
    NetworkUnavailable {
        /// How long the connect routine waited on the reachability signal.
        waited: Duration,
    },

    /// Name resolution for the receiver host failed.
    #[error("cannot resolve {host}")]
    Resolve {
        /// The hostname that failed to resolve.
        host: String,
        /// The underlying resolver failure.
        #[source]
        source: std::io::Error,
    },

    /// No address of the resolved set accepted a connection in time.
    #[error("connect to {host} timed out after {}ms", .after.as_millis())]
    ConnectTimeout {
        /// The receiver host.
        host: String,
        /// The configured connect timeout.
        after: Duration,
    },

    /// The receiver did not produce a reply line in time.
    #[error("no reply from receiver after {}ms", .after.as_millis())]
    ReadTimeout {
        /// The configured read timeout.
        after: Duration,
    },

    /// Socket or stream I/O failed.
    #[error("receiver link failed")]
    Io(#[from] std::io::Error),
}

/// Failure initializing the CEC bus, fatal at construction and fatal if it
/// recurs while reopening the session for a power-on.
#[derive(Debug, Error)]
pub enum CecError {
    /// The bus configuration could not be assembled.
    #[error("invalid bus configuration: {0}")]
    Config(String),

    /// No CEC adapter was found on this host.
    #[error("no CEC adapter found")]
    NoAdapter,

    /// Opening a session on the discovered adapter failed.
    #[error("cannot open CEC bus session: {0:?}")]
    SessionOpen(cec_rs::CecConnectionResultError),

    /// Registering this service as the active source failed.
    #[error("cannot register as active source: {0:?}")]
    ActivateSource(cec_rs::CecConnectionResultError),
}

/// An unrecognized power-state string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid power state: {0}")]
pub struct ParsePowerStateError(pub String);

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

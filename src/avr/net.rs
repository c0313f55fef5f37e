// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network-reachability signal.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared network-reachability signal.
///
/// The embedding service flips this from its OS network-change
/// notification; [`AvrClient`](crate::AvrClient) waits on it before
/// dialing the receiver. The signal is a watch channel, not a bare flag:
/// a waiter that blocked before the edge arrived is woken.
///
/// Cloning is cheap and all clones observe the same signal.
///
/// # Examples
///
/// ```
/// use wakesync::NetworkStatus;
///
/// let network = NetworkStatus::default();
/// assert!(network.is_available());
///
/// network.set_available(false);
/// assert!(!network.is_available());
/// ```
#[derive(Debug, Clone)]
pub struct NetworkStatus {
    sender: Arc<watch::Sender<bool>>,
}

impl NetworkStatus {
    /// Creates the signal with the given initial reachability.
    #[must_use]
    pub fn new(available: bool) -> Self {
        Self {
            sender: Arc::new(watch::Sender::new(available)),
        }
    }

    /// Records a network-availability edge.
    pub fn set_available(&self, available: bool) {
        self.sender.send_replace(available);
    }

    /// Returns the current reachability without waiting.
    #[must_use]
    pub fn is_available(&self) -> bool {
        *self.sender.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for NetworkStatus {
    /// Starts reachable — the common case for a service coming up on an
    /// already-connected host.
    fn default() -> Self {
        Self::new(true)
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types shared across the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Power state of a managed device.
///
/// `Unknown` means the last operation did not conclusively establish the
/// state — a device that ignored a query, answered garbage, or was not
/// ready on the bus. It never means "not yet checked".
///
/// # Examples
///
/// ```
/// use wakesync::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "on");
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    /// Device confirmed on.
    On,
    /// Device confirmed off (or in standby).
    Off,
    /// State could not be established.
    Unknown,
}

impl PowerState {
    /// Returns the lowercase string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` if the state is conclusively known.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = crate::error::ParsePowerStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "unknown" => Ok(Self::Unknown),
            _ => Err(crate::error::ParsePowerStateError(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips() {
        for state in [PowerState::On, PowerState::Off, PowerState::Unknown] {
            assert_eq!(state.as_str().parse::<PowerState>().unwrap(), state);
        }
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("standby".parse::<PowerState>().is_err());
        assert!("".parse::<PowerState>().is_err());
    }

    #[test]
    fn from_bool() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
    }

    #[test]
    fn is_known() {
        assert!(PowerState::On.is_known());
        assert!(PowerState::Off.is_known());
        assert!(!PowerState::Unknown.is_known());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(PowerState::Unknown.to_string(), "unknown");
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fixed command table of the receiver's control protocol.
//!
//! Each entry pairs a semantic action with its wire command and the reply
//! pattern the receiver answers query-style commands with. The table is
//! built once per client instance; there is no process-wide state.

use crate::types::PowerState;

/// Semantic actions the client can perform on the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AvrAction {
    /// Ask for the current power state.
    QueryPower,
    /// Switch the receiver on.
    PowerOn,
    /// Switch the receiver off.
    PowerOff,
}

/// One row of the command table: action, wire command, expected reply.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandSpec {
    pub wire: &'static str,
    pub expect: ReplyPattern,
}

/// Matcher for a receiver reply line: a fixed prefix followed by one of
/// the accepted status digits. Digit `0` means on, `1` means off.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReplyPattern {
    prefix: &'static str,
    digits: &'static [char],
}

impl ReplyPattern {
    /// Maps a reply line to a power state. Anything that does not match
    /// the pattern — wrong prefix, unexpected digit, empty line — maps to
    /// [`PowerState::Unknown`].
    pub(crate) fn power_state(&self, line: &str) -> PowerState {
        let Some(rest) = line.strip_prefix(self.prefix) else {
            return PowerState::Unknown;
        };
        match rest.chars().next() {
            Some(digit) if self.digits.contains(&digit) => {
                if digit == '0' {
                    PowerState::On
                } else {
                    PowerState::Off
                }
            }
            _ => PowerState::Unknown,
        }
    }
}

/// The complete, immutable command table of one client instance.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommandSet {
    query_power: CommandSpec,
    power_on: CommandSpec,
    power_off: CommandSpec,
}

impl CommandSet {
    pub(crate) fn new() -> Self {
        Self {
            query_power: CommandSpec {
                wire: "?P",
                expect: ReplyPattern {
                    prefix: "PWR",
                    digits: &['0', '1'],
                },
            },
            power_on: CommandSpec {
                wire: "PO",
                expect: ReplyPattern {
                    prefix: "PWR",
                    digits: &['0'],
                },
            },
            power_off: CommandSpec {
                wire: "PF",
                expect: ReplyPattern {
                    prefix: "PWR",
                    digits: &['1'],
                },
            },
        }
    }

    pub(crate) fn get(&self, action: AvrAction) -> &CommandSpec {
        match action {
            AvrAction::QueryPower => &self.query_power,
            AvrAction::PowerOn => &self.power_on,
            AvrAction::PowerOff => &self.power_off,
        }
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP client for the receiver's line-oriented control protocol.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::avr::command::{AvrAction, CommandSet, CommandSpec};
use crate::avr::net::NetworkStatus;
use crate::error::{ConnectivityError, Result};
use crate::types::PowerState;

/// Configuration for the receiver's control connection.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use wakesync::AvrConfig;
///
/// let config = AvrConfig::new("avr.lan")
///     .with_port(23)
///     .with_timeout(Duration::from_secs(2));
/// assert_eq!(config.host(), "avr.lan");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvrConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl AvrConfig {
    /// Default control port of the receiver.
    pub const DEFAULT_PORT: u16 = 23;
    /// Default bound for the reachability wait, the connect and each
    /// read/write on the link.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Creates a configuration for the given receiver host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom control port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the timeout applied to the reachability wait, the connect and
    /// each socket operation.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the receiver host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the control port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Reader/writer halves of the open control connection.
///
/// Holding both in one value keeps the invariant that the pair is either
/// fully present or fully absent.
struct AvrLink {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// Client for the receiver's TCP control protocol.
///
/// The client resolves the receiver's address set at construction, then
/// connects lazily before the first command. One connection is kept for
/// the client's lifetime; on the first failed socket operation the client
/// drops it, redials and retries the command exactly once. Every connect
/// attempt first waits on the shared [`NetworkStatus`] signal so that a
/// host without network fails fast with a connectivity error instead of
/// stalling in the socket layer.
///
/// # Examples
///
/// ```no_run
/// use wakesync::{AvrClient, AvrConfig, NetworkStatus};
///
/// # async fn example() -> wakesync::Result<()> {
/// let client = AvrClient::new(AvrConfig::new("avr.lan"), NetworkStatus::default()).await?;
/// client.power_on().await?;
/// let state = client.power_status().await?;
/// println!("receiver is {state}");
/// # Ok(())
/// # }
/// ```
pub struct AvrClient {
    config: AvrConfig,
    addrs: Vec<SocketAddr>,
    commands: CommandSet,
    network: NetworkStatus,
    link: Mutex<Option<AvrLink>>,
}

impl AvrClient {
    /// Creates a client for the configured receiver, resolving its
    /// address set.
    ///
    /// No connection is opened yet; the first command establishes it.
    ///
    /// # Errors
    ///
    /// Returns a connectivity error if the host does not resolve to any
    /// address.
    pub async fn new(config: AvrConfig, network: NetworkStatus) -> Result<Self> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((config.host(), config.port()))
            .await
            .map_err(|source| ConnectivityError::Resolve {
                host: config.host().to_string(),
                source,
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ConnectivityError::Resolve {
                host: config.host().to_string(),
                source: std::io::ErrorKind::AddrNotAvailable.into(),
            }
            .into());
        }
        tracing::debug!(host = %config.host(), addresses = addrs.len(), "resolved receiver");

        Ok(Self {
            addrs,
            commands: CommandSet::new(),
            network,
            link: Mutex::new(None),
            config,
        })
    }

    /// Returns the configured receiver host.
    #[must_use]
    pub fn host(&self) -> &str {
        self.config.host()
    }

    /// Returns the configured control port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.config.port()
    }

    /// Switches the receiver on.
    ///
    /// Fire-and-forget: the command is sent and no reply is read.
    ///
    /// # Errors
    ///
    /// Returns a connectivity error if the command could not be delivered.
    pub async fn power_on(&self) -> Result<()> {
        self.transmit(AvrAction::PowerOn).await
    }

    /// Switches the receiver off.
    ///
    /// Fire-and-forget: the command is sent and no reply is read.
    ///
    /// # Errors
    ///
    /// Returns a connectivity error if the command could not be delivered.
    pub async fn power_off(&self) -> Result<()> {
        self.transmit(AvrAction::PowerOff).await
    }

    /// Queries the receiver's power state.
    ///
    /// Sends the query and reads exactly one reply line. A reply that does
    /// not match the expected pattern, or a cleanly closed connection with
    /// no reply, yields [`PowerState::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns a connectivity error if the round-trip failed on the
    /// network layer, including a reply that never arrived in time.
    pub async fn power_status(&self) -> Result<PowerState> {
        let spec = self.commands.get(AvrAction::QueryPower);
        let mut guard = self.link.lock().await;

        let reused = guard.is_some();
        let mut link = match guard.take() {
            Some(link) => link,
            None => self.establish().await?,
        };

        match query_line(&mut link, spec, self.config.timeout()).await {
            Ok(Some(line)) => {
                let state = spec.expect.power_state(line.trim_end());
                *guard = Some(link);
                Ok(state)
            }
            Ok(None) if !reused => {
                // fresh connection, clean close, no reply line
                close_link(link).await;
                Ok(PowerState::Unknown)
            }
            // a reused pair answering EOF is a stale link; treat like a
            // failed socket operation and retry on a fresh connection
            Ok(None) | Err(_) => {
                tracing::debug!(command = spec.wire, "status round-trip failed, reconnecting");
                close_link(link).await;
                let mut link = self.establish().await?;
                match query_line(&mut link, spec, self.config.timeout()).await {
                    Ok(Some(line)) => {
                        let state = spec.expect.power_state(line.trim_end());
                        *guard = Some(link);
                        Ok(state)
                    }
                    Ok(None) => {
                        close_link(link).await;
                        Ok(PowerState::Unknown)
                    }
                    Err(err) => {
                        close_link(link).await;
                        Err(err.into())
                    }
                }
            }
        }
    }

    /// Drops the current connection, closing reader, writer and socket.
    ///
    /// Safe to call at any time: resetting a client that never connected,
    /// or was already reset, is a no-op. The next command establishes a
    /// fresh connection.
    pub async fn reset(&self) {
        if let Some(link) = self.link.lock().await.take() {
            close_link(link).await;
        }
    }

    /// Sends a fire-and-forget command, reconnecting once on the first
    /// failed send.
    async fn transmit(&self, action: AvrAction) -> Result<()> {
        let spec = self.commands.get(action);
        let mut guard = self.link.lock().await;

        let mut link = match guard.take() {
            Some(link) => link,
            None => self.establish().await?,
        };

        match write_line(&mut link, spec.wire, self.config.timeout()).await {
            Ok(()) => {
                *guard = Some(link);
                Ok(())
            }
            Err(first) => {
                tracing::debug!(command = spec.wire, error = %first, "send failed, reconnecting");
                close_link(link).await;
                let mut link = self.establish().await?;
                match write_line(&mut link, spec.wire, self.config.timeout()).await {
                    Ok(()) => {
                        *guard = Some(link);
                        Ok(())
                    }
                    Err(second) => {
                        close_link(link).await;
                        Err(second.into())
                    }
                }
            }
        }
    }

    /// Opens a fresh connection: reachability gate, bounded connect,
    /// line-oriented stream pair.
    async fn establish(&self) -> std::result::Result<AvrLink, ConnectivityError> {
        let timeout = self.config.timeout();

        // Gate on the reachability signal before any socket call.
        let mut network = self.network.subscribe();
        match tokio::time::timeout(timeout, network.wait_for(|up| *up)).await {
            Ok(Ok(_)) => {}
            Ok(Err(_)) | Err(_) => {
                return Err(ConnectivityError::NetworkUnavailable { waited: timeout });
            }
        }

        // Try the resolved address set, bounded by the same timeout.
        let dial = async {
            let mut last: Option<std::io::Error> = None;
            for addr in &self.addrs {
                match TcpStream::connect(addr).await {
                    Ok(stream) => return Ok(stream),
                    Err(err) => last = Some(err),
                }
            }
            Err(last.unwrap_or_else(|| std::io::ErrorKind::AddrNotAvailable.into()))
        };
        let stream = match tokio::time::timeout(timeout, dial).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(ConnectivityError::Io(source)),
            Err(_) => {
                return Err(ConnectivityError::ConnectTimeout {
                    host: self.config.host().to_string(),
                    after: timeout,
                });
            }
        };
        tracing::debug!(host = %self.config.host(), port = self.config.port(), "connected to receiver");

        let (read, write) = stream.into_split();
        Ok(AvrLink {
            reader: BufReader::new(read),
            writer: write,
        })
    }
}

impl crate::device::PowerControl for AvrClient {
    async fn power_on(&self) -> Result<()> {
        AvrClient::power_on(self).await
    }

    async fn power_off(&self) -> Result<()> {
        AvrClient::power_off(self).await
    }

    async fn power_status(&self) -> Result<PowerState> {
        AvrClient::power_status(self).await
    }

    async fn shutdown(&self) {
        self.reset().await;
    }
}

impl std::fmt::Debug for AvrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvrClient")
            .field("host", &self.config.host())
            .field("port", &self.config.port())
            .finish_non_exhaustive()
    }
}

/// Writes one newline-terminated ASCII command, bounded by `timeout`.
async fn write_line(
    link: &mut AvrLink,
    wire: &str,
    timeout: Duration,
) -> std::result::Result<(), ConnectivityError> {
    let mut frame = Vec::with_capacity(wire.len() + 1);
    frame.extend_from_slice(wire.as_bytes());
    frame.push(b'\n');

    let io = async {
        link.writer.write_all(&frame).await?;
        link.writer.flush().await
    };
    match tokio::time::timeout(timeout, io).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(ConnectivityError::Io(source)),
        Err(_) => Err(ConnectivityError::Io(std::io::ErrorKind::TimedOut.into())),
    }
}

/// Sends a query and reads exactly one reply line. `Ok(None)` is a clean
/// close before any reply.
async fn query_line(
    link: &mut AvrLink,
    spec: &CommandSpec,
    timeout: Duration,
) -> std::result::Result<Option<String>, ConnectivityError> {
    write_line(link, spec.wire, timeout).await?;

    let mut line = String::new();
    match tokio::time::timeout(timeout, link.reader.read_line(&mut line)).await {
        Ok(Ok(0)) => Ok(None),
        Ok(Ok(_)) => Ok(Some(line)),
        Ok(Err(source)) => Err(ConnectivityError::Io(source)),
        Err(_) => Err(ConnectivityError::ReadTimeout { after: timeout }),
    }
}

/// Closes a connection pair. Dropping the halves closes the socket; the
/// explicit shutdown first gives the peer a clean FIN.
async fn close_link(mut link: AvrLink) {
    let _ = link.writer.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = AvrConfig::new("avr.lan");
        assert_eq!(config.port(), 23);
        assert_eq!(config.timeout(), AvrConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn config_builders() {
        let config = AvrConfig::new("avr.lan")
            .with_port(8102)
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.port(), 8102);
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn new_resolves_literal_addresses() {
        let client = AvrClient::new(AvrConfig::new("127.0.0.1"), NetworkStatus::default())
            .await
            .unwrap();
        assert_eq!(client.host(), "127.0.0.1");
        assert_eq!(client.addrs.len(), 1);
    }

    #[tokio::test]
    async fn new_fails_on_unresolvable_host() {
        let result = AvrClient::new(
            AvrConfig::new("no-such-host.invalid"),
            NetworkStatus::default(),
        )
        .await;
        assert!(matches!(
            result,
            Err(crate::Error::Avr(ConnectivityError::Resolve { .. }))
        ));
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for the live event channel.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default watchdog interval for connect attempts.
pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(30);

/// Configuration for an [`EventChannel`](crate::channel::EventChannel).
///
/// The channel connects to `ws://host:port/` (or `wss://` when the
/// deployment is TLS-terminated). The watchdog bounds each connect attempt;
/// the reconnect backoff spaces retries after failed attempts and defaults
/// to the watchdog interval. There is no exponential backoff, no jitter and
/// no retry cap: the channel retries forever.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lumenlink::channel::ChannelConfig;
///
/// let config = ChannelConfig::new("hub.local", 8765)
///     .with_tls(true)
///     .with_watchdog(Duration::from_secs(10));
///
/// assert_eq!(config.url(), "wss://hub.local:8765/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Whether the deployment is TLS-terminated (`wss://` vs `ws://`).
    #[serde(default)]
    pub tls: bool,
    /// Watchdog interval for connect attempts.
    #[serde(default = "default_watchdog")]
    pub watchdog: Duration,
    /// Backoff between failed connect attempts. `None` follows the watchdog
    /// interval; see [`reconnect_backoff`](Self::reconnect_backoff).
    #[serde(default)]
    pub reconnect_backoff: Option<Duration>,
}

fn default_watchdog() -> Duration {
    DEFAULT_WATCHDOG
}

impl ChannelConfig {
    /// Creates a configuration for the given host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: false,
            watchdog: DEFAULT_WATCHDOG,
            reconnect_backoff: None,
        }
    }

    /// Sets the TLS flag.
    #[must_use]
    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Sets the watchdog interval.
    #[must_use]
    pub fn with_watchdog(mut self, watchdog: Duration) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Sets the backoff between failed connect attempts.
    #[must_use]
    pub fn with_reconnect_backoff(mut self, backoff: Duration) -> Self {
        self.reconnect_backoff = Some(backoff);
        self
    }

    /// Returns the effective reconnect backoff: the explicit value if one
    /// was set, the watchdog interval otherwise.
    #[must_use]
    pub fn reconnect_backoff(&self) -> Duration {
        self.reconnect_backoff.unwrap_or(self.watchdog)
    }

    /// Renders the WebSocket URL for this configuration.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.tls { "wss" } else { "ws" };
        format!("{scheme}://{}:{}/", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_tls() {
        let config = ChannelConfig::new("192.168.1.10", 8765);
        assert_eq!(config.url(), "ws://192.168.1.10:8765/");
    }

    #[test]
    fn url_with_tls() {
        let config = ChannelConfig::new("hub.example.org", 443).with_tls(true);
        assert_eq!(config.url(), "wss://hub.example.org:443/");
    }

    #[test]
    fn watchdog_default_is_thirty_seconds() {
        let config = ChannelConfig::new("host", 1);
        assert_eq!(config.watchdog, Duration::from_secs(30));
        assert_eq!(config.reconnect_backoff(), Duration::from_secs(30));
    }

    #[test]
    fn backoff_follows_watchdog_until_overridden() {
        let config = ChannelConfig::new("host", 1).with_watchdog(Duration::from_secs(5));
        assert_eq!(config.watchdog, Duration::from_secs(5));
        assert_eq!(config.reconnect_backoff(), Duration::from_secs(5));
    }

    #[test]
    fn explicit_backoff_is_kept() {
        let config = ChannelConfig::new("host", 1)
            .with_reconnect_backoff(Duration::from_millis(100))
            .with_watchdog(Duration::from_secs(5));
        assert_eq!(config.reconnect_backoff(), Duration::from_millis(100));
    }

    #[test]
    fn explicit_backoff_equal_to_watchdog_is_kept() {
        let config = ChannelConfig::new("host", 1)
            .with_reconnect_backoff(Duration::from_secs(30))
            .with_watchdog(Duration::from_secs(5));
        assert_eq!(config.reconnect_backoff(), Duration::from_secs(30));
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The live event channel and its reconnect state machine.
//!
//! An [`EventChannel`] keeps exactly one connection to the hub's event feed
//! open, transparently reconnecting after failures, and fans inbound events
//! out to registered listeners. The state machine is a single linear task:
//!
//! - each connect attempt is bounded by the watchdog interval; on expiry the
//!   half-open attempt is dropped and a new one starts immediately
//! - a failed attempt backs off for the configured interval, then retries
//! - a close or error on a live connection reconnects immediately
//! - there is no terminal state and no retry cap; the loop runs until the
//!   channel is dropped
//!
//! Because one task owns at most one transport, the "two connections racing"
//! hazard of callback-driven designs cannot occur here.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, trace, warn};

use crate::error::ChannelError;

use super::config::ChannelConfig;
use super::envelope::Envelope;
use super::registry::ListenerRegistry;
use super::transport::{Connector, WsConnector, validate_url};

/// Shared connection status flags.
#[derive(Debug, Default)]
struct Status {
    connected: AtomicBool,
    pending: AtomicBool,
}

impl Status {
    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        if connected {
            self.pending.store(false, Ordering::SeqCst);
        }
    }

    fn set_pending(&self, pending: bool) {
        self.pending.store(pending, Ordering::SeqCst);
    }
}

/// A reconnecting connection to the hub's live event feed.
///
/// The channel is an owned instance: construct it at the composition root
/// and share it (or just its registration surface) where needed. Each test
/// can construct a fresh channel with its own fake connector.
///
/// # Examples
///
/// ```no_run
/// use lumenlink::channel::{ChannelConfig, EventChannel};
///
/// #[tokio::main]
/// async fn main() -> lumenlink::Result<()> {
///     let channel = EventChannel::new(ChannelConfig::new("hub.local", 8765));
///
///     channel.register_listener_for(
///         |args| println!("now playing: {args}"),
///         &["music.Play"],
///     );
///
///     channel.open()?;
///     // ... the channel now maintains the connection in the background
///     Ok(())
/// }
/// ```
pub struct EventChannel {
    config: ChannelConfig,
    registry: Arc<ListenerRegistry>,
    connector: Arc<dyn Connector>,
    status: Arc<Status>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EventChannel {
    /// Creates a channel that connects over WebSocket per the configuration.
    #[must_use]
    pub fn new(config: ChannelConfig) -> Self {
        let connector = Arc::new(WsConnector::new(config.url()));
        Self::with_connector(config, connector)
    }

    /// Creates a channel with a custom transport connector.
    ///
    /// This is the seam used by tests to drive the state machine with an
    /// in-memory transport.
    #[must_use]
    pub fn with_connector(config: ChannelConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            registry: Arc::new(ListenerRegistry::new()),
            connector,
            status: Arc::new(Status::default()),
            task: Mutex::new(None),
        }
    }

    /// Registers a listener for every event.
    pub fn register_listener<F>(&self, listener: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.registry.add_wildcard(listener);
    }

    /// Registers a listener for one or more event type names.
    pub fn register_listener_for<F>(&self, listener: F, event_types: &[&str])
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.registry.add_for_types(listener, event_types);
    }

    /// Returns `true` while a connection is established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.status.connected.load(Ordering::SeqCst)
    }

    /// Returns `true` while the channel is between connections and trying
    /// to (re)connect.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.pending.load(Ordering::SeqCst)
    }

    /// Opens the channel and starts the reconnect loop.
    ///
    /// Must be called from within a tokio runtime. The loop runs until the
    /// channel is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidAddress`] if no transport can be
    /// constructed for the configured address; the channel then stays
    /// disconnected and no retry loop is started. Returns
    /// [`ChannelError::AlreadyOpen`] if the loop is already running.
    pub fn open(&self) -> Result<(), ChannelError> {
        if let Err(e) = validate_url(&self.config.url()) {
            error!(error = %e, "cannot construct event channel transport");
            return Err(e);
        }

        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(ChannelError::AlreadyOpen);
        }

        let connector = Arc::clone(&self.connector);
        let registry = Arc::clone(&self.registry);
        let status = Arc::clone(&self.status);
        let config = self.config.clone();
        *task = Some(tokio::spawn(run(connector, registry, status, config)));
        Ok(())
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("url", &self.config.url())
            .field("connected", &self.is_connected())
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// The reconnect loop.
async fn run(
    connector: Arc<dyn Connector>,
    registry: Arc<ListenerRegistry>,
    status: Arc<Status>,
    config: ChannelConfig,
) {
    let backoff = config.reconnect_backoff();
    // Safe: practical intervals never exceed u64::MAX milliseconds
    #[allow(clippy::cast_possible_truncation)]
    let watchdog_ms = config.watchdog.as_millis() as u64;
    #[allow(clippy::cast_possible_truncation)]
    let backoff_ms = backoff.as_millis() as u64;

    loop {
        status.set_pending(true);

        let attempt = timeout(config.watchdog, connector.connect())
            .await
            .map_err(|_| ChannelError::Timeout(watchdog_ms))
            .and_then(|inner| inner);

        match attempt {
            Err(e @ ChannelError::Timeout(_)) => {
                // Watchdog: drop the half-open attempt and go again.
                warn!(error = %e, "connect attempt exceeded watchdog, retrying");
            }
            Err(e @ ChannelError::InvalidAddress(_)) => {
                // Construction failure: no retry loop; a fresh open() is
                // the only recovery.
                error!(error = %e, "transport cannot be constructed, giving up");
                status.set_pending(false);
                return;
            }
            Err(e) => {
                warn!(error = %e, backoff_ms, "connect failed, backing off");
                sleep(backoff).await;
            }
            Ok(mut transport) => {
                status.set_connected(true);
                debug!("event channel connected");

                while let Some(frame) = transport.next_frame().await {
                    match frame {
                        Ok(text) => handle_frame(&registry, &text),
                        Err(e) => {
                            warn!(error = %e, "transport error, reconnecting");
                            break;
                        }
                    }
                }

                status.set_connected(false);
                debug!("event channel disconnected, reconnecting");
            }
        }
    }
}

/// Parses one inbound frame and dispatches it if it carries an event.
///
/// Malformed frames are logged and dropped; they never take the channel
/// down.
fn handle_frame(registry: &ListenerRegistry, text: &str) {
    match Envelope::parse(text) {
        Err(e) => {
            warn!(error = %e, "dropping malformed frame");
        }
        Ok(envelope) if !envelope.is_event() => {
            trace!(kind = %envelope.kind, "ignoring non-event envelope");
        }
        Ok(envelope) => match envelope.event_type() {
            Err(e) => {
                warn!(error = %e, "dropping event without routing key");
            }
            Ok(event_type) => {
                trace!(event_type, "dispatching event");
                registry.dispatch(event_type, &envelope.args);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use futures_util::FutureExt;
    use futures_util::future::BoxFuture;
    use serde_json::json;

    use crate::channel::transport::Transport;

    /// Transport that yields scripted frames, then stays open forever.
    struct ScriptedTransport {
        frames: VecDeque<String>,
        close_after_frames: bool,
    }

    impl Transport for ScriptedTransport {
        fn next_frame(&mut self) -> BoxFuture<'_, Option<Result<String, ChannelError>>> {
            let next = self.frames.pop_front();
            let close = self.close_after_frames;
            async move {
                match next {
                    Some(frame) => Some(Ok(frame)),
                    None if close => None,
                    None => {
                        futures_util::future::pending::<()>().await;
                        unreachable!()
                    }
                }
            }
            .boxed()
        }
    }

    /// Connector handing out scripted transports and counting attempts.
    struct ScriptedConnector {
        attempts: AtomicUsize,
        frames: Vec<String>,
        close_after_frames: bool,
        /// When set, connect attempts never resolve (watchdog territory).
        hang: bool,
    }

    impl ScriptedConnector {
        fn with_frames(frames: Vec<String>) -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                frames,
                close_after_frames: false,
                hang: false,
            }
        }

        fn closing(frames: Vec<String>) -> Self {
            Self {
                close_after_frames: true,
                ..Self::with_frames(frames)
            }
        }

        fn hanging() -> Self {
            Self {
                hang: true,
                ..Self::with_frames(Vec::new())
            }
        }

        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl Connector for ScriptedConnector {
        fn connect(&self) -> BoxFuture<'_, Result<Box<dyn Transport>, ChannelError>> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if self.hang {
                    futures_util::future::pending::<()>().await;
                    unreachable!()
                }
                // Only the first connection replays frames; reconnects get
                // an idle transport.
                let frames = if attempt == 0 {
                    self.frames.clone().into()
                } else {
                    VecDeque::new()
                };
                Ok(Box::new(ScriptedTransport {
                    frames,
                    close_after_frames: self.close_after_frames && attempt == 0,
                }) as Box<dyn Transport>)
            }
            .boxed()
        }
    }

    fn test_config() -> ChannelConfig {
        ChannelConfig::new("127.0.0.1", 9)
            .with_watchdog(Duration::from_millis(50))
            .with_reconnect_backoff(Duration::from_millis(10))
    }

    fn event_frame(event_type: &str) -> String {
        json!({"type": "event", "args": {"type": event_type, "track": "X"}}).to_string()
    }

    async fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
        let start = tokio::time::Instant::now();
        while start.elapsed() < deadline {
            if condition() {
                return true;
            }
            sleep(Duration::from_millis(5)).await;
        }
        condition()
    }

    #[tokio::test]
    async fn dispatches_event_to_wildcard_and_typed_listeners() {
        let connector = Arc::new(ScriptedConnector::with_frames(vec![event_frame(
            "music.Play",
        )]));
        let channel = EventChannel::with_connector(test_config(), connector);

        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let order_clone = order.clone();
        channel.register_listener_for(
            move |args| {
                order_clone
                    .lock()
                    .push(("typed", args["track"].clone()));
            },
            &["music.Play"],
        );

        let order_clone = order.clone();
        channel.register_listener(move |args| {
            order_clone
                .lock()
                .push(("wildcard", args["track"].clone()));
        });

        channel.open().unwrap();

        assert!(wait_until(Duration::from_secs(2), || order.lock().len() == 2).await);
        let seen = order.lock().clone();
        assert_eq!(seen[0], ("wildcard", json!("X")));
        assert_eq!(seen[1], ("typed", json!("X")));
    }

    #[tokio::test]
    async fn non_event_and_malformed_frames_are_ignored() {
        let connector = Arc::new(ScriptedConnector::with_frames(vec![
            r#"{"type":"response","args":{"type":"music.Play"}}"#.to_string(),
            "not json".to_string(),
            event_frame("music.Play"),
        ]));
        let channel = EventChannel::with_connector(test_config(), connector);

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        channel.register_listener(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        channel.open().unwrap();

        // Only the final, well-formed event frame dispatches.
        assert!(
            wait_until(Duration::from_secs(2), || counter.load(Ordering::SeqCst) == 1).await
        );
        sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reconnects_after_close() {
        let connector = Arc::new(ScriptedConnector::closing(vec![event_frame("a.B")]));
        let channel = EventChannel::with_connector(test_config(), connector.clone());

        channel.open().unwrap();

        assert!(wait_until(Duration::from_secs(2), || connector.attempts() >= 2).await);
        assert!(wait_until(Duration::from_secs(2), || channel.is_connected()).await);
    }

    #[tokio::test]
    async fn watchdog_forces_new_connect_attempt() {
        let connector = Arc::new(ScriptedConnector::hanging());
        let channel = EventChannel::with_connector(test_config(), connector.clone());

        channel.open().unwrap();

        // The 50 ms watchdog should abandon hung attempts and start new
        // ones; observe at least a second construction of the transport.
        assert!(wait_until(Duration::from_secs(2), || connector.attempts() >= 2).await);
        assert!(!channel.is_connected());
        assert!(channel.is_pending());
    }

    #[tokio::test]
    async fn watchdog_retry_skips_backoff() {
        let connector = Arc::new(ScriptedConnector::hanging());
        // A long backoff makes the distinction observable: timed-out
        // attempts must retry immediately, not wait it out.
        let config = ChannelConfig::new("127.0.0.1", 9)
            .with_watchdog(Duration::from_millis(50))
            .with_reconnect_backoff(Duration::from_secs(60));
        let channel = EventChannel::with_connector(config, connector.clone());

        channel.open().unwrap();

        assert!(wait_until(Duration::from_secs(2), || connector.attempts() >= 3).await);
    }

    #[tokio::test]
    async fn open_rejects_invalid_address() {
        let config = ChannelConfig::new("not a host name", 8765);
        let channel = EventChannel::new(config);

        let result = channel.open();
        assert!(matches!(result, Err(ChannelError::InvalidAddress(_))));
        assert!(!channel.is_connected());
        assert!(!channel.is_pending());
    }

    #[tokio::test]
    async fn open_twice_is_rejected() {
        let connector = Arc::new(ScriptedConnector::with_frames(Vec::new()));
        let channel = EventChannel::with_connector(test_config(), connector);

        channel.open().unwrap();
        assert!(matches!(channel.open(), Err(ChannelError::AlreadyOpen)));
    }

    #[tokio::test]
    async fn connected_flag_tracks_connection() {
        let connector = Arc::new(ScriptedConnector::with_frames(Vec::new()));
        let channel = EventChannel::with_connector(test_config(), connector);

        assert!(!channel.is_connected());
        channel.open().unwrap();
        assert!(wait_until(Duration::from_secs(2), || channel.is_connected()).await);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live event channel to the hub's event feed.
//!
//! This module maintains a persistent WebSocket connection to the hub,
//! automatically reconnecting on failure or timeout, parses inbound event
//! envelopes, and dispatches them to interest-based listeners.
//!
//! # Overview
//!
//! - [`ChannelConfig`] - host/port/TLS and watchdog settings
//! - [`EventChannel`] - the reconnecting connection and its run loop
//! - [`ListenerRegistry`] - wildcard and per-type listener lists
//! - [`Envelope`] - the wire format of inbound frames
//! - [`Connector`] / [`Transport`] - the transport seam (WebSocket in
//!   production, in-memory fakes in tests)
//!
//! # Usage
//!
//! ```no_run
//! use lumenlink::channel::{ChannelConfig, EventChannel};
//!
//! # async fn example() -> lumenlink::Result<()> {
//! let channel = EventChannel::new(ChannelConfig::new("hub.local", 8765));
//!
//! channel.register_listener_for(
//!     |args| println!("volume: {}", args["level"]),
//!     &["audio.VolumeChanged"],
//! );
//!
//! channel.open()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod envelope;
mod event_channel;
mod registry;
mod transport;

pub use config::{ChannelConfig, DEFAULT_WATCHDOG};
pub use envelope::{Envelope, KIND_EVENT};
pub use event_channel::EventChannel;
pub use registry::ListenerRegistry;
pub use transport::{Connector, Transport, WsConnector, validate_url};

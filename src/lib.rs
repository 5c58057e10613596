// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `LumenLink` - core runtime components for a smart-lighting control hub.
//!
//! This library provides the two pieces a hub frontend needs beyond plain
//! REST glue:
//!
//! - **Color model conversion**: convert a color sample between RGB, HSL and
//!   CIE xy representations, honoring the per-channel value scales a given
//!   lighting backend expects (see [`color`]).
//! - **Live event channel**: a reconnecting WebSocket connection to the
//!   hub's event feed with interest-based listener dispatch (see
//!   [`channel`]).
//!
//! The two components are independent; compose them as your application
//! needs.
//!
//! # Color conversion
//!
//! ```
//! use lumenlink::color::{Color, ColorConverter, Range, RangeSet};
//!
//! // A converter for a backend using Hue-bridge value scales
//! let converter = ColorConverter::with_ranges(
//!     RangeSet::new()
//!         .with_hue(Range::new(0.0, 65535.0))
//!         .with_sat(Range::new(0.0, 254.0))
//!         .with_bri(Range::new(0.0, 254.0)),
//! );
//!
//! let hsl = converter.rgb_to_hsl(0.0, 255.0, 0.0);
//! assert_eq!(hsl.hue.round(), (65535.0_f64 / 3.0).round());
//!
//! let xy = converter.rgb_to_xy(0.0, 255.0, 0.0);
//! assert!(xy.y > 0.7);
//! ```
//!
//! # Event channel
//!
//! ```no_run
//! use lumenlink::channel::{ChannelConfig, EventChannel};
//!
//! #[tokio::main]
//! async fn main() -> lumenlink::Result<()> {
//!     let channel = EventChannel::new(ChannelConfig::new("192.168.1.50", 8765));
//!
//!     // Wildcard listener: receives every event
//!     channel.register_listener(|args| {
//!         println!("event: {args}");
//!     });
//!
//!     // Typed listener: receives only matching events
//!     channel.register_listener_for(
//!         |args| println!("now playing: {}", args["track"]),
//!         &["music.Play"],
//!     );
//!
//!     channel.open()?;
//!
//!     // The channel reconnects forever in the background; park the main
//!     // task on whatever your application does next.
//!     std::future::pending::<()>().await;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod color;
pub mod error;

pub use channel::{ChannelConfig, EventChannel, ListenerRegistry};
pub use color::{Color, ColorConverter, HslColor, Range, RangeSet, RgbColor, XyColor, XyPoint};
pub use error::{ChannelError, Error, ParseError, Result, ValueError};

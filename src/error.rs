// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `lumenlink` library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: color value validation, channel transport failures, and wire
//! frame parsing.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred on the live event channel.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Error occurred while parsing a wire frame.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to color value validation.
///
/// These errors occur when constructing color values from untrusted input,
/// such as hex color strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid hex color string was provided.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),
}

/// Errors related to the live event channel transport.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The configured address cannot be used to construct a transport.
    ///
    /// This is a construction failure: the channel stays disconnected and no
    /// reconnect loop is started. A fresh call to
    /// [`EventChannel::open`](crate::channel::EventChannel::open) is the only
    /// recovery.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The underlying WebSocket transport reported an error.
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// A connect attempt exceeded the watchdog interval.
    #[error("connect attempt timed out after {0} ms")]
    Timeout(u64),

    /// The channel is already running.
    #[error("channel is already open")]
    AlreadyOpen,
}

/// Errors related to parsing inbound frames.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the envelope.
    #[error("missing field in envelope: {0}")]
    MissingField(String),

    /// Unexpected envelope format.
    #[error("unexpected envelope format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

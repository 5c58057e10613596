// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire envelope for inbound event frames.
//!
//! Every frame on the live event channel is one JSON document:
//!
//! ```json
//! {"type": "event", "args": {"type": "music.Play", "track": "X"}}
//! ```
//!
//! The outer `type` discriminates the envelope kind; only `"event"`
//! envelopes are dispatched. The nested `args.type` is the routing key
//! consumers subscribe to. Both field names are literally `type`/`args` on
//! the wire.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// Envelope kind that carries a dispatchable event.
pub const KIND_EVENT: &str = "event";

/// An inbound message envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Envelope discriminator (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: String,
    /// Event payload (`args` on the wire). Absent for some non-event
    /// envelope kinds.
    #[serde(default)]
    pub args: Value,
}

impl Envelope {
    /// Parses a text frame into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] for non-JSON text and
    /// [`ParseError::UnexpectedFormat`] for JSON that is not an object with
    /// a string `type` field.
    pub fn parse(frame: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(frame)?;
        if !value.is_object() {
            return Err(ParseError::UnexpectedFormat(
                "frame is not a JSON object".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(ParseError::Json)
    }

    /// Returns `true` if this envelope carries a dispatchable event.
    #[must_use]
    pub fn is_event(&self) -> bool {
        self.kind == KIND_EVENT
    }

    /// Returns the routing key (`args.type`) for an event envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] when `args.type` is absent or
    /// not a string.
    pub fn event_type(&self) -> Result<&str, ParseError> {
        self.args
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingField("args.type".to_string()))
    }
}

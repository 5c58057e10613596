// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color model conversion for smart-lighting devices.
//!
//! This module converts a color sample between the representations used by
//! lighting control surfaces:
//!
//! - [`RgbColor`] - 8-bit RGB channels
//! - [`HslColor`] - hue/saturation/lightness in configurable range units
//! - [`XyColor`] / [`XyPoint`] - CIE 1931 xy chromaticity (plus brightness)
//!
//! The [`ColorConverter`] performs the numeric transforms, honoring a
//! [`RangeSet`] that describes the value scales a particular lighting
//! backend expects. Loose hub payloads are turned into the explicit
//! [`Color`] union once, at the boundary, by [`Color::from_value`].
//!
//! # Examples
//!
//! ```
//! use lumenlink::color::{Color, ColorConverter};
//! use serde_json::json;
//!
//! let converter = ColorConverter::new();
//!
//! // A payload as it arrives from the hub
//! let payload = json!({"hue": 120, "sat": 100, "bri": 50});
//! let color = Color::from_value(&payload).expect("recognized representation");
//!
//! let rgb = converter.to_rgb(&color);
//! assert_eq!((rgb.red(), rgb.green(), rgb.blue()), (0, 255, 0));
//! ```

mod converter;
mod model;
mod range;

pub use converter::ColorConverter;
pub use model::{Color, HslColor, RgbColor, XyColor, XyPoint};
pub use range::{Range, RangeSet};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color value types and the tagged union of input representations.
//!
//! Hub messages carry colors in several loosely-shaped forms (`r/g/b`
//! fields, `red/green/blue` fields, an `rgb` array, `x/y` chromaticity, an
//! `xy` array, or a `hue/sat/bri` triple). [`Color::from_value`] sniffs those
//! shapes once, at the boundary where a value enters the system; everything
//! downstream works on the explicit [`Color`] union.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// This is the output representation of every conversion path that ends in
/// RGB. Channels are always clamped integers.
///
/// # Examples
///
/// ```
/// use lumenlink::color::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0); // Orange
/// assert_eq!(color.red(), 255);
/// assert_eq!(color.to_hex(), "FF8000");
///
/// let red = RgbColor::from_hex("#FF0000").unwrap();
/// assert_eq!(red, RgbColor::red_color());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts formats: `#RRGGBB`, `RRGGBB`, `#RGB`, `RGB`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidHexColor`] if the hex string is invalid.
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let hex = hex.trim_start_matches('#');

        match hex.len() {
            3 => {
                let chars: Vec<char> = hex.chars().collect();
                let r = parse_hex_char(chars[0])?;
                let g = parse_hex_char(chars[1])?;
                let b = parse_hex_char(chars[2])?;
                // Expand 0-F to 0-255
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = parse_hex_pair(&hex[0..2])?;
                let g = parse_hex_pair(&hex[2..4])?;
                let b = parse_hex_pair(&hex[4..6])?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ValueError::InvalidHexColor(hex.to_string())),
        }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as a hex string without the hash prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Returns the color as a hex string with the hash prefix.
    #[must_use]
    pub fn to_hex_with_hash(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Pure red.
    #[must_use]
    pub const fn red_color() -> Self {
        Self::new(255, 0, 0)
    }

    /// Pure green.
    #[must_use]
    pub const fn green_color() -> Self {
        Self::new(0, 255, 0)
    }

    /// Pure blue.
    #[must_use]
    pub const fn blue_color() -> Self {
        Self::new(0, 0, 255)
    }

    /// White.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Black.
    #[must_use]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_with_hash())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

fn parse_hex_char(c: char) -> Result<u8, ValueError> {
    c.to_digit(16)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| ValueError::InvalidHexColor(c.to_string()))
}

fn parse_hex_pair(s: &str) -> Result<u8, ValueError> {
    u8::from_str_radix(s, 16).map_err(|_| ValueError::InvalidHexColor(s.to_string()))
}

/// HSL color expressed in a converter's configured range units.
///
/// The numeric meaning of each field depends on the
/// [`RangeSet`](crate::color::RangeSet) of the converter that produced or
/// consumes it, not on a fixed canonical scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HslColor {
    /// Hue, in configured hue-range units.
    pub hue: f64,
    /// Saturation, in configured sat-range units.
    pub sat: f64,
    /// Brightness (lightness), in configured bri-range units.
    pub bri: f64,
}

impl HslColor {
    /// Creates a new HSL color.
    #[must_use]
    pub const fn new(hue: f64, sat: f64, bri: f64) -> Self {
        Self { hue, sat, bri }
    }
}

/// CIE xy chromaticity plus brightness.
///
/// `x` and `y` are CIE 1931 chromaticity coordinates in `[0, 1]`, rounded to
/// four decimal places by the conversions that produce them. `bri` is in the
/// converter's configured brightness units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyColor {
    /// CIE x chromaticity coordinate.
    pub x: f64,
    /// CIE y chromaticity coordinate.
    pub y: f64,
    /// Brightness, in configured bri-range units.
    pub bri: f64,
}

impl XyColor {
    /// Creates a new xy color.
    #[must_use]
    pub const fn new(x: f64, y: f64, bri: f64) -> Self {
        Self { x, y, bri }
    }
}

/// CIE xy chromaticity point without brightness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XyPoint {
    /// CIE x chromaticity coordinate.
    pub x: f64,
    /// CIE y chromaticity coordinate.
    pub y: f64,
}

impl XyPoint {
    /// Creates a new xy point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A color sample in exactly one representation.
///
/// Conversions on [`ColorConverter`](crate::color::ColorConverter) match
/// exhaustively over this union; the "which fields are present" probing of
/// loose hub payloads happens once, in [`Color::from_value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// RGB channels. Values `<= 1.0` are treated as already-normalized
    /// fractions; larger values are assumed to be on the 0-255 scale.
    Rgb {
        /// Red channel.
        r: f64,
        /// Green channel.
        g: f64,
        /// Blue channel.
        b: f64,
    },
    /// HSL triple in configured range units.
    Hsl(HslColor),
    /// CIE xy chromaticity with optional brightness. A missing brightness
    /// defaults to the top of the configured brightness range.
    Xy {
        /// CIE x chromaticity coordinate.
        x: f64,
        /// CIE y chromaticity coordinate.
        y: f64,
        /// Brightness in configured bri-range units, if present.
        bri: Option<f64>,
    },
}

impl Color {
    /// Builds a [`Color`] from a loose JSON payload.
    ///
    /// Recognized shapes, probed in this order:
    ///
    /// - `{"r": .., "g": .., "b": ..}`
    /// - `{"red": .., "green": .., "blue": ..}`
    /// - `{"rgb": [r, g, b]}`
    /// - `{"x": .., "y": ..}` with optional `bri`
    /// - `{"xy": [x, y]}` with optional `bri`
    /// - `{"hue": .., "sat": .., "bri": ..}`
    ///
    /// Returns `None` when no recognizable field set is present. Callers are
    /// expected to log that condition rather than guess.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumenlink::color::Color;
    /// use serde_json::json;
    ///
    /// let color = Color::from_value(&json!({"r": 255, "g": 128, "b": 0}));
    /// assert!(matches!(color, Some(Color::Rgb { .. })));
    ///
    /// assert!(Color::from_value(&json!({"brightness": 10})).is_none());
    /// ```
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if let (Some(r), Some(g), Some(b)) = (num(value, "r"), num(value, "g"), num(value, "b")) {
            return Some(Self::Rgb { r, g, b });
        }

        if let (Some(r), Some(g), Some(b)) = (
            num(value, "red"),
            num(value, "green"),
            num(value, "blue"),
        ) {
            return Some(Self::Rgb { r, g, b });
        }

        if let Some([r, g, b]) = triple(value, "rgb") {
            return Some(Self::Rgb { r, g, b });
        }

        if let (Some(x), Some(y)) = (num(value, "x"), num(value, "y")) {
            return Some(Self::Xy {
                x,
                y,
                bri: num(value, "bri"),
            });
        }

        if let Some([x, y]) = pair(value, "xy") {
            return Some(Self::Xy {
                x,
                y,
                bri: num(value, "bri"),
            });
        }

        if let (Some(hue), Some(sat), Some(bri)) = (
            num(value, "hue"),
            num(value, "sat"),
            num(value, "bri"),
        ) {
            return Some(Self::Hsl(HslColor::new(hue, sat, bri)));
        }

        None
    }
}

impl From<RgbColor> for Color {
    fn from(rgb: RgbColor) -> Self {
        Self::Rgb {
            r: f64::from(rgb.red()),
            g: f64::from(rgb.green()),
            b: f64::from(rgb.blue()),
        }
    }
}

impl From<HslColor> for Color {
    fn from(hsl: HslColor) -> Self {
        Self::Hsl(hsl)
    }
}

impl From<XyColor> for Color {
    fn from(xy: XyColor) -> Self {
        Self::Xy {
            x: xy.x,
            y: xy.y,
            bri: Some(xy.bri),
        }
    }
}

fn num(value: &Value, field: &str) -> Option<f64> {
    value.get(field).and_then(Value::as_f64)
}

fn triple(value: &Value, field: &str) -> Option<[f64; 3]> {
    let arr = value.get(field)?.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    Some([arr[0].as_f64()?, arr[1].as_f64()?, arr[2].as_f64()?])
}

fn pair(value: &Value, field: &str) -> Option<[f64; 2]> {
    let arr = value.get(field)?.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    Some([arr[0].as_f64()?, arr[1].as_f64()?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rgb_new_and_accessors() {
        let color = RgbColor::new(255, 128, 0);
        assert_eq!(color.red(), 255);
        assert_eq!(color.green(), 128);
        assert_eq!(color.blue(), 0);
    }

    #[test]
    fn rgb_from_hex_full() {
        let color = RgbColor::from_hex("#FF5733").unwrap();
        assert_eq!(color, RgbColor::new(255, 87, 51));

        let color = RgbColor::from_hex("00FF00").unwrap();
        assert_eq!(color, RgbColor::green_color());
    }

    #[test]
    fn rgb_from_hex_short() {
        let color = RgbColor::from_hex("#F00").unwrap();
        assert_eq!(color, RgbColor::red_color());
    }

    #[test]
    fn rgb_from_hex_invalid() {
        assert!(RgbColor::from_hex("#GG0000").is_err());
        assert!(RgbColor::from_hex("#FF00").is_err());
        assert!(RgbColor::from_hex("").is_err());
    }

    #[test]
    fn rgb_hex_output() {
        let color = RgbColor::new(0, 15, 255);
        assert_eq!(color.to_hex(), "000FFF");
        assert_eq!(color.to_hex_with_hash(), "#000FFF");
        assert_eq!(color.to_string(), "#000FFF");
    }

    #[test]
    fn rgb_from_str() {
        let color: RgbColor = "#FF0000".parse().unwrap();
        assert_eq!(color, RgbColor::red_color());
    }

    #[test]
    fn rgb_from_tuple() {
        let color: RgbColor = (0u8, 0u8, 255u8).into();
        assert_eq!(color, RgbColor::blue_color());
    }

    #[test]
    fn color_from_value_rgb_fields() {
        let color = Color::from_value(&json!({"r": 255, "g": 0, "b": 0})).unwrap();
        assert_eq!(color, Color::Rgb { r: 255.0, g: 0.0, b: 0.0 });
    }

    #[test]
    fn color_from_value_long_rgb_fields() {
        let color = Color::from_value(&json!({"red": 10, "green": 20, "blue": 30})).unwrap();
        assert_eq!(color, Color::Rgb { r: 10.0, g: 20.0, b: 30.0 });
    }

    #[test]
    fn color_from_value_rgb_array() {
        let color = Color::from_value(&json!({"rgb": [1, 2, 3]})).unwrap();
        assert_eq!(color, Color::Rgb { r: 1.0, g: 2.0, b: 3.0 });
    }

    #[test]
    fn color_from_value_xy_fields() {
        let color = Color::from_value(&json!({"x": 0.32, "y": 0.33, "bri": 80})).unwrap();
        assert_eq!(
            color,
            Color::Xy {
                x: 0.32,
                y: 0.33,
                bri: Some(80.0)
            }
        );
    }

    #[test]
    fn color_from_value_xy_array_without_bri() {
        let color = Color::from_value(&json!({"xy": [0.5, 0.4]})).unwrap();
        assert_eq!(
            color,
            Color::Xy {
                x: 0.5,
                y: 0.4,
                bri: None
            }
        );
    }

    #[test]
    fn color_from_value_hsl_fields() {
        let color = Color::from_value(&json!({"hue": 120, "sat": 50, "bri": 75})).unwrap();
        assert_eq!(color, Color::Hsl(HslColor::new(120.0, 50.0, 75.0)));
    }

    #[test]
    fn color_from_value_unrecognized() {
        assert!(Color::from_value(&json!({"brightness": 10})).is_none());
        assert!(Color::from_value(&json!("red")).is_none());
        assert!(Color::from_value(&json!({"rgb": [1, 2]})).is_none());
    }

    #[test]
    fn color_from_rgb_color() {
        let color: Color = RgbColor::new(255, 0, 0).into();
        assert_eq!(color, Color::Rgb { r: 255.0, g: 0.0, b: 0.0 });
    }
}

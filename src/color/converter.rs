// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color model conversions for lighting control.
//!
//! A [`ColorConverter`] converts a single color sample between the
//! representations used by lighting control surfaces: RGB, HSL, and CIE xy
//! chromaticity plus brightness. All values outside RGB are expressed in the
//! converter's configured [`RangeSet`] units, because different device
//! protocols put hue/saturation/brightness on different numeric scales.
//!
//! The xy pipeline uses the Wide RGB D65 matrices with sRGB gamma, the
//! variant used by several lighting vendors' color engines. The gamut
//! correction applied when a linear channel exceeds 1.0 (rescaling all
//! channels by the largest, to preserve hue) is a Philips-Hue-derived
//! heuristic, not a proven-general algorithm.
//!
//! # Examples
//!
//! ```
//! use lumenlink::color::{Color, ColorConverter};
//!
//! let converter = ColorConverter::new();
//!
//! let hsl = converter.rgb_to_hsl(255.0, 0.0, 0.0);
//! assert_eq!(hsl.hue, 0.0);
//! assert_eq!(hsl.sat, 100.0);
//!
//! let xy = converter.rgb_to_xy(255.0, 0.0, 0.0);
//! assert!(xy.x > 0.6);
//! ```

use tracing::debug;

use super::model::{Color, HslColor, RgbColor, XyColor, XyPoint};
use super::range::{CANONICAL_HUE, CANONICAL_PERCENT, Range, RangeSet};

/// sRGB gamma-encode threshold (linear side).
const GAMMA_ENCODE_THRESHOLD: f64 = 0.003_130_8;

/// sRGB gamma-decode threshold (encoded side).
const GAMMA_DECODE_THRESHOLD: f64 = 0.040_45;

/// Converter between lighting color representations.
///
/// Stateless beyond its immutable [`RangeSet`]; cheap to clone and safe to
/// share across tasks without coordination.
#[derive(Debug, Clone, Default)]
pub struct ColorConverter {
    ranges: RangeSet,
}

impl ColorConverter {
    /// Creates a converter bound to the default range conventions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter bound to a custom range convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumenlink::color::{ColorConverter, Range, RangeSet};
    ///
    /// let ranges = RangeSet::new().with_bri(Range::new(0.0, 254.0));
    /// let converter = ColorConverter::with_ranges(ranges);
    /// assert_eq!(converter.ranges().bri.max, 254.0);
    /// ```
    #[must_use]
    pub const fn with_ranges(ranges: RangeSet) -> Self {
        Self { ranges }
    }

    /// Returns the range convention this converter is bound to.
    #[must_use]
    pub const fn ranges(&self) -> &RangeSet {
        &self.ranges
    }

    /// Converts RGB channels to HSL in configured range units.
    ///
    /// Channel values `> 1.0` are assumed to be on the 0-255 scale and are
    /// normalized first; values `<= 1.0` are taken as fractions. Achromatic
    /// input yields hue 0 and saturation 0.
    #[must_use]
    pub fn rgb_to_hsl(&self, r: f64, g: f64, b: f64) -> HslColor {
        let r = normalize_channel(r);
        let g = normalize_channel(g);
        let b = normalize_channel(b);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let lightness = (max + min) / 2.0;

        let (hue, sat) = if delta.abs() < f64::EPSILON {
            // Achromatic
            (0.0, 0.0)
        } else {
            let sat = if lightness > 0.5 {
                delta / (2.0 - max - min)
            } else {
                delta / (max + min)
            };
            let hue = if (max - r).abs() < f64::EPSILON {
                let h = ((g - b) / delta) % 6.0;
                if h < 0.0 { h + 6.0 } else { h }
            } else if (max - g).abs() < f64::EPSILON {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            (hue * 60.0, sat)
        };

        HslColor::new(
            CANONICAL_HUE.rescale(hue, &self.ranges.hue),
            CANONICAL_PERCENT.rescale(sat * 100.0, &self.ranges.sat),
            CANONICAL_PERCENT.rescale(lightness * 100.0, &self.ranges.bri),
        )
    }

    /// Converts an HSL triple in configured range units to RGB.
    #[must_use]
    pub fn hsl_to_rgb(&self, hsl: &HslColor) -> RgbColor {
        let hue = self.ranges.hue.rescale(hsl.hue, &CANONICAL_HUE);
        let sat = self.ranges.sat.rescale(hsl.sat, &CANONICAL_PERCENT) / 100.0;
        let lightness = self.ranges.bri.rescale(hsl.bri, &CANONICAL_PERCENT) / 100.0;

        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * sat;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r, g, b) = if hue < 60.0 {
            (c, x, 0.0)
        } else if hue < 120.0 {
            (x, c, 0.0)
        } else if hue < 180.0 {
            (0.0, c, x)
        } else if hue < 240.0 {
            (0.0, x, c)
        } else if hue < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        RgbColor::new(
            to_byte(r + m),
            to_byte(g + m),
            to_byte(b + m),
        )
    }

    /// Converts CIE xy chromaticity plus brightness to RGB.
    ///
    /// A missing `bri` defaults to the top of the configured brightness
    /// range. Linear channels exceeding 1.0 are rescaled relative to the
    /// largest channel before gamma encoding, which preserves hue at the
    /// cost of clipping luminance. Degenerate input (`y == 0`) produces
    /// black rather than NaN.
    #[must_use]
    pub fn xy_to_rgb(&self, x: f64, y: f64, bri: Option<f64>) -> RgbColor {
        let bri = bri.unwrap_or(self.ranges.bri.max);
        let luminance = self.ranges.bri.rescale(bri, &Range::new(0.0, 1.0));

        // xyY -> XYZ. Degenerate y makes these non-finite; they poison all
        // three channels below, which then collapse to black.
        let z = 1.0 - x - y;
        let cie_x = (luminance / y) * x;
        let cie_z = (luminance / y) * z;

        // XYZ -> linear RGB, Wide RGB D65 inverse matrix
        let mut r = cie_x * 1.656_492 - luminance * 0.354_851 - cie_z * 0.255_038;
        let mut g = -cie_x * 0.707_196 + luminance * 1.655_397 + cie_z * 0.036_152;
        let mut b = cie_x * 0.051_713 - luminance * 0.121_364 + cie_z * 1.011_530;

        r = finite_or_zero(r).max(0.0);
        g = finite_or_zero(g).max(0.0);
        b = finite_or_zero(b).max(0.0);

        // Hue-preserving gamut correction: rescale by the largest channel
        // instead of clamping each channel independently.
        let max = r.max(g).max(b);
        if max > 1.0 {
            r /= max;
            g /= max;
            b /= max;
        }

        RgbColor::new(
            to_byte(gamma_encode(r)),
            to_byte(gamma_encode(g)),
            to_byte(gamma_encode(b)),
        )
    }

    /// Converts RGB channels to a CIE xy chromaticity point.
    ///
    /// Coordinates are rounded to four decimal places; degenerate input
    /// (pure black) yields `(0, 0)` rather than NaN.
    #[must_use]
    pub fn rgb_to_xy(&self, r: f64, g: f64, b: f64) -> XyPoint {
        let r = gamma_decode(normalize_channel(r));
        let g = gamma_decode(normalize_channel(g));
        let b = gamma_decode(normalize_channel(b));

        // Linear RGB -> XYZ, Wide RGB D65 forward matrix
        let cie_x = r * 0.664_511 + g * 0.154_324 + b * 0.162_028;
        let cie_y = r * 0.283_881 + g * 0.668_433 + b * 0.047_685;
        let cie_z = r * 0.000_088 + g * 0.072_310 + b * 0.986_039;

        let sum = cie_x + cie_y + cie_z;
        XyPoint::new(
            round4(finite_or_zero(cie_x / sum)),
            round4(finite_or_zero(cie_y / sum)),
        )
    }

    /// Approximates a brightness value for an RGB sample.
    ///
    /// Returns `min(2 * L, bri.max)` where `L` is the lightness component of
    /// [`rgb_to_hsl`](Self::rgb_to_hsl) in configured units.
    #[must_use]
    pub fn rgb_to_bri(&self, r: f64, g: f64, b: f64) -> f64 {
        let lightness = self.rgb_to_hsl(r, g, b).bri;
        (2.0 * lightness).min(self.ranges.bri.max)
    }

    /// Converts any color representation to RGB.
    #[must_use]
    pub fn to_rgb(&self, color: &Color) -> RgbColor {
        match *color {
            Color::Rgb { r, g, b } => RgbColor::new(
                to_byte(normalize_channel(r)),
                to_byte(normalize_channel(g)),
                to_byte(normalize_channel(b)),
            ),
            Color::Hsl(hsl) => self.hsl_to_rgb(&hsl),
            Color::Xy { x, y, bri } => self.xy_to_rgb(x, y, bri),
        }
    }

    /// Converts any color representation to CIE xy plus brightness.
    ///
    /// Representations without a direct path chain through RGB.
    #[must_use]
    pub fn to_xy(&self, color: &Color) -> XyColor {
        match *color {
            Color::Xy { x, y, bri } => {
                XyColor::new(x, y, bri.unwrap_or(self.ranges.bri.max))
            }
            Color::Rgb { r, g, b } => {
                let point = self.rgb_to_xy(r, g, b);
                XyColor::new(point.x, point.y, self.rgb_to_bri(r, g, b))
            }
            Color::Hsl(_) => {
                let rgb = self.to_rgb(color);
                debug!(?color, "converting to xy via rgb");
                let (r, g, b) = (
                    f64::from(rgb.red()),
                    f64::from(rgb.green()),
                    f64::from(rgb.blue()),
                );
                let point = self.rgb_to_xy(r, g, b);
                XyColor::new(point.x, point.y, self.rgb_to_bri(r, g, b))
            }
        }
    }

    /// Converts any color representation to HSL in configured range units.
    ///
    /// Representations without a direct path chain through RGB.
    #[must_use]
    pub fn to_hsl(&self, color: &Color) -> HslColor {
        match *color {
            Color::Hsl(hsl) => hsl,
            Color::Rgb { r, g, b } => self.rgb_to_hsl(r, g, b),
            Color::Xy { .. } => {
                let rgb = self.to_rgb(color);
                self.rgb_to_hsl(
                    f64::from(rgb.red()),
                    f64::from(rgb.green()),
                    f64::from(rgb.blue()),
                )
            }
        }
    }
}

/// Treats channel magnitudes above 1.0 as 0-255 scaled and normalizes them
/// to fractions.
fn normalize_channel(value: f64) -> f64 {
    let value = finite_or_zero(value);
    if value.abs() > 1.0 {
        (value / 255.0).clamp(0.0, 1.0)
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Replaces NaN and infinities with 0.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// sRGB gamma encoding (linear -> display).
fn gamma_encode(value: f64) -> f64 {
    if value <= GAMMA_ENCODE_THRESHOLD {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB gamma decoding (display -> linear).
fn gamma_decode(value: f64) -> f64 {
    if value > GAMMA_DECODE_THRESHOLD {
        ((value + 0.055) / 1.055).powf(2.4)
    } else {
        value / 12.92
    }
}

/// Scales a 0-1 fraction to a clamped 0-255 integer channel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(value: f64) -> u8 {
    (finite_or_zero(value).clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Rounds to four decimal places.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

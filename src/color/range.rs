// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-channel value range conventions.
//!
//! Different lighting backends express hue, saturation, brightness and color
//! temperature on different numeric scales (a Hue bridge uses hue 0-65535 and
//! saturation 0-254, Tasmota uses hue 0-360 and saturation 0-100, and so on).
//! A [`RangeSet`] captures the convention a
//! [`ColorConverter`](crate::color::ColorConverter) produces and consumes.

use serde::{Deserialize, Serialize};

/// A closed numeric interval `[min, max]`.
///
/// # Examples
///
/// ```
/// use lumenlink::color::Range;
///
/// let hue = Range::new(0.0, 360.0);
/// assert_eq!(hue.span(), 360.0);
/// assert_eq!(hue.clamp(400.0), 360.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound of the interval.
    pub min: f64,
    /// Upper bound of the interval.
    pub max: f64,
}

impl Range {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the width of the interval.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamps a value into the interval.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Linearly rescales `value` from this range into `target`.
    ///
    /// Degenerate source ranges (zero span) map everything to `target.min`.
    #[must_use]
    pub fn rescale(&self, value: f64, target: &Range) -> f64 {
        if self.span() == 0.0 {
            return target.min;
        }
        let fraction = (value - self.min) / self.span();
        target.min + fraction * target.span()
    }
}

/// Canonical range for hue values (degrees).
pub(crate) const CANONICAL_HUE: Range = Range::new(0.0, 360.0);

/// Canonical range for percentage-scaled channels (saturation, brightness).
pub(crate) const CANONICAL_PERCENT: Range = Range::new(0.0, 100.0);

/// Per-channel range convention for a lighting backend.
///
/// Unspecified channels keep their defaults: hue `[0, 360]`, saturation
/// `[0, 100]`, brightness `[0, 100]`, color temperature `[154, 500]`
/// (mireds). A `RangeSet` is immutable once handed to a converter.
///
/// # Examples
///
/// ```
/// use lumenlink::color::{Range, RangeSet};
///
/// // Philips Hue bridge conventions
/// let ranges = RangeSet::new()
///     .with_hue(Range::new(0.0, 65535.0))
///     .with_sat(Range::new(0.0, 254.0))
///     .with_bri(Range::new(0.0, 254.0));
///
/// assert_eq!(ranges.hue.max, 65535.0);
/// assert_eq!(ranges.ct.min, 154.0); // default kept
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSet {
    /// Hue channel range.
    pub hue: Range,
    /// Saturation channel range.
    pub sat: Range,
    /// Brightness channel range.
    pub bri: Range,
    /// Color temperature channel range.
    pub ct: Range,
}

impl RangeSet {
    /// Creates a range set with the documented defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hue: Range::new(0.0, 360.0),
            sat: Range::new(0.0, 100.0),
            bri: Range::new(0.0, 100.0),
            ct: Range::new(154.0, 500.0),
        }
    }

    /// Overrides the hue range.
    #[must_use]
    pub const fn with_hue(mut self, range: Range) -> Self {
        self.hue = range;
        self
    }

    /// Overrides the saturation range.
    #[must_use]
    pub const fn with_sat(mut self, range: Range) -> Self {
        self.sat = range;
        self
    }

    /// Overrides the brightness range.
    #[must_use]
    pub const fn with_bri(mut self, range: Range) -> Self {
        self.bri = range;
        self
    }

    /// Overrides the color temperature range.
    #[must_use]
    pub const fn with_ct(mut self, range: Range) -> Self {
        self.ct = range;
        self
    }
}

impl Default for RangeSet {
    fn default() -> Self {
        Self::new()
    }
}

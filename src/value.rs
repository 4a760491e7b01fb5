//! Numeric helpers shared by the pipeline stages.
//!
//! Every stage of the pipeline works in `f64`. Labels are compared after
//! rounding to [`LABEL_PRECISION`] decimals, and numbers leaving the crate as
//! text use the same shortest-round-trip rules as the chart frontend.
//!
//! # Example
//!
//! ```rust
//! use plotfit::value::{round_to, format_number, linspace};
//!
//! assert_eq!(round_to(0.1 + 0.2, 6), 0.3);
//! assert_eq!(format_number(2.0), "2");
//! assert_eq!(format_number(1e-7), "1e-7");
//! assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
//! ```
use std::ops::RangeInclusive;

/// Decimal digits kept on labels and function samples for stable cross-series matching.
pub const LABEL_PRECISION: usize = 6;

/// Rounds a value to `digits` decimal places.
///
/// Goes through decimal formatting rather than scaling, so large magnitudes
/// cannot overflow and the result is the nearest representable decimal.
/// Non-finite values are returned unchanged.
#[must_use]
pub fn round_to(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let rounded = format!("{value:.digits$}").parse::<f64>().unwrap_or(value);

    // `-0.000000` parses to -0.0
    rounded + 0.0
}

/// Rounds a label to [`LABEL_PRECISION`] decimals.
#[inline]
#[must_use]
pub fn round_label(value: f64) -> f64 {
    round_to(value, LABEL_PRECISION)
}

/// Hashable identity of a rounded label. `-0.0` and `0.0` share a key.
#[inline]
#[must_use]
pub fn label_key(value: f64) -> u64 {
    (round_label(value) + 0.0).to_bits()
}

/// Formats a number the way the chart frontend stringifies it.
///
/// - Integers print without a fractional part (`2`, not `2.0`)
/// - Magnitudes in `[1e-6, 1e21)` print in plain decimal notation
/// - Everything else uses exponent notation with an explicit sign (`1.5e+21`, `1e-7`)
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    } else if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    } else if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{value}");
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

/// `count` evenly spaced values covering `min..=max`.
///
/// The last value is exactly `max`, regardless of accumulated rounding.
#[must_use]
pub fn linspace(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { max } else { min + step * i as f64 })
                .filter(|x| x.is_finite())
                .collect()
        }
    }
}

/// Extension trait for accessing the `x` and `y` coordinates of a point set.
///
/// # Examples
///
/// ```
/// # use plotfit::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
/// assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
/// assert_eq!(data.x_range(), Some(0.0..=2.0));
/// ```
pub trait CoordExt {
    /// Returns an iterator over the x-coordinates.
    fn x_iter(&self) -> impl Iterator<Item = f64>;

    /// Returns an iterator over the y-coordinates.
    fn y_iter(&self) -> impl Iterator<Item = f64>;

    /// Collects the x-coordinates.
    fn x(&self) -> Vec<f64> {
        self.x_iter().collect()
    }

    /// Collects the y-coordinates.
    fn y(&self) -> Vec<f64> {
        self.y_iter().collect()
    }

    /// Inclusive range of the x-coordinates, `None` when empty.
    fn x_range(&self) -> Option<RangeInclusive<f64>> {
        min_max(self.x_iter())
    }

    /// Inclusive range of the y-coordinates, `None` when empty.
    fn y_range(&self) -> Option<RangeInclusive<f64>> {
        min_max(self.y_iter())
    }
}
impl CoordExt for [(f64, f64)] {
    fn x_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|(_, y)| *y)
    }
}
impl CoordExt for Vec<(f64, f64)> {
    fn x_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|(_, y)| *y)
    }
}

/// Smallest and largest value of an iterator.
pub(crate) fn min_max(values: impl Iterator<Item = f64>) -> Option<RangeInclusive<f64>> {
    values
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(match acc {
                Some((min, max)) => (min.min(v), max.max(v)),
                None => (v, v),
            })
        })
        .map(|(min, max)| min..=max)
}

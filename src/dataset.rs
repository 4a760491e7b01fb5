//! Sorted, de-duplicated views over raw `(x, y)` points, with label lookup.
//!
//! A [`NormalizedSeries`] never extrapolates: labels outside the point range, or
//! between two points closer than [`SPAN_TOLERANCE`], have no value.
//!
//! ```rust
//! use plotfit::dataset::NormalizedSeries;
//!
//! let series = NormalizedSeries::new([(2.0, 4.0), (0.0, 0.0), (2.0, 5.0)]);
//! assert_eq!(series.points(), &[(0.0, 0.0), (2.0, 5.0)]);
//! assert_eq!(series.valid_count(), 3);
//!
//! assert_eq!(series.value_at(1.0), Some(2.5));
//! assert_eq!(series.value_at(3.0), None);
//! ```
use std::ops::RangeInclusive;

use crate::value::CoordExt;

/// Spans narrower than this are treated as a single point when interpolating.
pub const SPAN_TOLERANCE: f64 = 1e-9;

/// Normalized view of one data series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedSeries {
    points: Vec<(f64, f64)>,
    valid_count: usize,
    valid_y: Option<RangeInclusive<f64>>,
}
impl NormalizedSeries {
    /// Builds the view from raw points.
    ///
    /// - Points with a non-finite coordinate are dropped.
    /// - `-0.0` is stored as `0.0`.
    /// - Points are stably sorted by `x`; among equal `x`, the last one wins.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut valid: Vec<(f64, f64)> = points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| (x + 0.0, y))
            .collect();
        valid.sort_by(|a, b| a.0.total_cmp(&b.0));

        let valid_count = valid.len();
        let valid_y = valid.y_range();

        let mut unique: Vec<(f64, f64)> = Vec::with_capacity(valid.len());
        for (x, y) in valid {
            match unique.last_mut() {
                Some(last) if last.0 == x => last.1 = y,
                _ => unique.push((x, y)),
            }
        }

        Self {
            points: unique,
            valid_count,
            valid_y,
        }
    }

    /// Unique points, ascending by `x`.
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of finite points before de-duplication.
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Number of unique points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no finite point survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Range of `x` over the unique points.
    #[must_use]
    pub fn x_range(&self) -> Option<RangeInclusive<f64>> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        Some(first.0..=last.0)
    }

    /// Range of `y` over every finite point, duplicates included.
    #[must_use]
    pub fn y_range(&self) -> Option<RangeInclusive<f64>> {
        self.valid_y.clone()
    }

    /// Value at exactly `x`, if a point sits there.
    #[must_use]
    pub fn get(&self, x: f64) -> Option<f64> {
        let x = x + 0.0;
        self.points
            .binary_search_by(|p| p.0.total_cmp(&x))
            .ok()
            .map(|i| self.points[i].1)
    }

    /// Linear interpolation strictly between the two points bracketing `label`.
    ///
    /// Returns `None` outside the point range, on an exact hit, or across a span
    /// narrower than [`SPAN_TOLERANCE`].
    #[must_use]
    pub fn interpolate(&self, label: f64) -> Option<f64> {
        let right = self.points.partition_point(|p| p.0 < label);
        self.interpolate_between(right, label)
    }

    fn interpolate_between(&self, right: usize, label: f64) -> Option<f64> {
        if right == 0 || right >= self.points.len() {
            return None;
        }

        let (x0, y0) = self.points[right - 1];
        let (x1, y1) = self.points[right];
        if !(x0 < label && label < x1) {
            return None;
        }

        let span = x1 - x0;
        if !span.is_finite() || span.abs() <= SPAN_TOLERANCE {
            return None;
        }

        let t = (label - x0) / span;
        Some(y0 + t * (y1 - y0))
    }

    /// Exact value if present, otherwise the interpolated one.
    #[must_use]
    pub fn value_at(&self, label: f64) -> Option<f64> {
        self.get(label).or_else(|| self.interpolate(label))
    }

    /// Projects the series onto a label axis.
    ///
    /// Walks a cursor through the points, so ascending labels cost one pass. Labels out
    /// of order are still answered correctly.
    #[must_use]
    pub fn project(&self, labels: &[f64]) -> Vec<Option<f64>> {
        let mut cursor = 0;
        let mut previous = f64::NEG_INFINITY;

        labels
            .iter()
            .map(|&label| {
                if label.is_nan() {
                    return None;
                }
                if label < previous {
                    cursor = 0;
                }
                previous = label;

                while cursor < self.points.len() && self.points[cursor].0 < label {
                    cursor += 1;
                }

                match self.points.get(cursor) {
                    Some(&(x, y)) if x == label => Some(y),
                    _ => self.interpolate_between(cursor, label),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_and_sorts() {
        let series = NormalizedSeries::new([
            (3.0, 1.0),
            (f64::NAN, 2.0),
            (1.0, f64::INFINITY),
            (-0.0, 5.0),
            (1.0, 7.0),
        ]);

        assert_eq!(series.points(), &[(0.0, 5.0), (1.0, 7.0), (3.0, 1.0)]);
        assert!(series.points()[0].0.is_sign_positive());
        assert_eq!(series.valid_count(), 3);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let series = NormalizedSeries::new([(1.0, 1.0), (0.0, 0.0), (1.0, 2.0), (1.0, 3.0)]);
        assert_eq!(series.points(), &[(0.0, 0.0), (1.0, 3.0)]);
        assert_eq!(series.valid_count(), 4);

        // Overwritten values still count towards the y range
        assert_eq!(series.y_range(), Some(0.0..=3.0));
        assert_eq!(series.get(1.0), Some(3.0));
    }

    #[test]
    fn test_interpolation() {
        let series = NormalizedSeries::new([(0.0, 0.0), (2.0, 4.0), (4.0, 0.0)]);
        assert_eq!(series.interpolate(1.0), Some(2.0));
        assert_eq!(series.interpolate(3.0), Some(2.0));

        // Exact hits are not interpolated
        assert_eq!(series.interpolate(2.0), None);
        assert_eq!(series.value_at(2.0), Some(4.0));

        // No extrapolation
        assert_eq!(series.value_at(-0.5), None);
        assert_eq!(series.value_at(4.5), None);
    }

    #[test]
    fn test_degenerate_span() {
        let series = NormalizedSeries::new([(0.0, 0.0), (1e-10, 1.0)]);
        assert_eq!(series.interpolate(0.5e-10), None);
    }

    #[test]
    fn test_project() {
        let series = NormalizedSeries::new([(0.0, 0.0), (1.0, 10.0), (3.0, 30.0)]);
        let projected = series.project(&[-1.0, 0.0, 0.5, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            projected,
            vec![None, Some(0.0), Some(5.0), Some(10.0), Some(20.0), Some(30.0), None]
        );

        // Out of order labels
        let projected = series.project(&[2.0, 0.5]);
        assert_eq!(projected, vec![Some(20.0), Some(5.0)]);
    }

    #[test]
    fn test_empty() {
        let series = NormalizedSeries::new(Vec::<(f64, f64)>::new());
        assert!(series.is_empty());
        assert_eq!(series.x_range(), None);
        assert_eq!(series.y_range(), None);
        assert_eq!(series.project(&[0.0]), vec![None]);
    }
}

//! Crossing points between the drawn series of a chart.
//!
//! Every pair of visible datasets is compared segment by segment along the label axis.
//! A pair meets where the two values are within [`TOUCH_TOLERANCE`] at a label, or where
//! their difference changes sign inside a segment. A crossing is placed by linear
//! interpolation of the difference.
//!
//! ```rust
//! use plotfit::chart::{ChartData, ChartDataset, DatasetStyle};
//! use plotfit::intersection::detect_intersections;
//!
//! let labels = vec![-2.0, -1.0, 0.0, 1.0, 2.0];
//! let up = labels.iter().map(|&x| Some(x)).collect();
//! let down = labels.iter().map(|&x| Some(-x)).collect();
//! let chart = ChartData::new(labels, vec![
//!     ChartDataset::new("y = x", up, DatasetStyle::default()),
//!     ChartDataset::new("y = -x", down, DatasetStyle::default()),
//! ]);
//!
//! let points = detect_intersections(&chart);
//! assert_eq!(points.len(), 1);
//! assert_eq!((points[0].x, points[0].y), (0.0, 0.0));
//! ```
use std::collections::HashSet;

use serde::Serialize;

use crate::chart::{ChartData, ChartDataset};

/// Values closer than this count as touching.
pub const TOUCH_TOLERANCE: f64 = 1e-6;

/// A point where two datasets meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionPoint {
    /// Horizontal position
    pub x: f64,

    /// Vertical position, taken from the first dataset
    pub y: f64,

    /// Display names of both datasets
    pub series_names: [String; 2],

    /// Indices of both datasets in the chart
    pub dataset_indices: [usize; 2],
}

/// Finds every point where two visible datasets meet.
///
/// Results are in discovery order: dataset pairs `(i, j)` with `i < j`, then segments
/// left to right. Points of one pair that round to the same 6-decimal coordinates are
/// reported once.
#[must_use]
pub fn detect_intersections(chart: &ChartData) -> Vec<IntersectionPoint> {
    let mut found = Intersections::default();
    let visible: Vec<(usize, &ChartDataset)> = chart.visible().collect();

    for (a, &(i, first)) in visible.iter().enumerate() {
        for &(j, second) in &visible[a + 1..] {
            let names = [display_name(first, i), display_name(second, j)];

            for (index, segment) in chart.labels.windows(2).enumerate() {
                let (x0, x1) = (segment[0], segment[1]);
                if !x0.is_finite() || !x1.is_finite() {
                    continue;
                }

                let values = (
                    value(first, index),
                    value(second, index),
                    value(first, index + 1),
                    value(second, index + 1),
                );
                let (Some(y0a), Some(y0b), Some(y1a), Some(y1b)) = values else {
                    continue;
                };

                let diff0 = y0a - y0b;
                let diff1 = y1a - y1b;

                if diff0.abs() <= TOUCH_TOLERANCE {
                    found.insert(x0, y0a, &names, [i, j]);
                }

                if diff1.abs() <= TOUCH_TOLERANCE {
                    found.insert(x1, y1a, &names, [i, j]);
                }

                let crosses = (diff0 < 0.0 && diff1 > 0.0) || (diff0 > 0.0 && diff1 < 0.0);
                if !crosses {
                    continue;
                }

                let denominator = diff0 - diff1;
                if !denominator.is_finite() || denominator.abs() < TOUCH_TOLERANCE {
                    continue;
                }

                let t = diff0 / denominator;
                if !(0.0..=1.0).contains(&t) {
                    continue;
                }

                let x = x0 + t * (x1 - x0);
                let y = y0a + t * (y1a - y0a);
                if x.is_finite() && y.is_finite() {
                    found.insert(x, y, &names, [i, j]);
                }
            }
        }
    }

    tracing::trace!(count = found.points.len(), "intersections detected");
    found.points
}

fn value(dataset: &ChartDataset, index: usize) -> Option<f64> {
    dataset
        .data
        .get(index)
        .copied()
        .flatten()
        .filter(|v| v.is_finite())
}

fn display_name(dataset: &ChartDataset, index: usize) -> String {
    if dataset.label.is_empty() {
        format!("Series {}", index + 1)
    } else {
        dataset.label.clone()
    }
}

#[derive(Default)]
struct Intersections {
    keys: HashSet<String>,
    points: Vec<IntersectionPoint>,
}
impl Intersections {
    fn insert(&mut self, x: f64, y: f64, names: &[String; 2], indices: [usize; 2]) {
        let key = format!(
            "{:.6}|{:.6}|{}-{}",
            x + 0.0,
            y + 0.0,
            indices[0],
            indices[1]
        );
        if self.keys.insert(key) {
            self.points.push(IntersectionPoint {
                x,
                y,
                series_names: names.clone(),
                dataset_indices: indices,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_close,
        chart::{ChartDataset, DatasetStyle},
    };

    fn dataset(label: &str, data: &[Option<f64>]) -> ChartDataset {
        ChartDataset::new(label, data.to_vec(), DatasetStyle::default())
    }

    #[test]
    fn test_crossing_is_interpolated() {
        let chart = ChartData::new(
            vec![0.0, 1.0],
            vec![
                dataset("rising", &[Some(0.0), Some(2.0)]),
                dataset("", &[Some(1.0), Some(1.0)]),
            ],
        );

        let points = detect_intersections(&chart);
        assert_eq!(points.len(), 1);
        assert_close!(points[0].x, 0.5);
        assert_close!(points[0].y, 1.0);
        assert_eq!(points[0].series_names, ["rising".to_string(), "Series 2".to_string()]);
        assert_eq!(points[0].dataset_indices, [0, 1]);
    }

    #[test]
    fn test_touching_endpoints() {
        let chart = ChartData::new(
            vec![0.0, 1.0, 2.0],
            vec![
                dataset("a", &[Some(1.0), Some(0.0), Some(1.0)]),
                dataset("b", &[Some(1.0), Some(-1.0), Some(1.0)]),
            ],
        );

        let points = detect_intersections(&chart);
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0]);
    }

    #[test]
    fn test_skips_hidden_and_gaps() {
        let mut hidden = dataset("hidden", &[Some(1.0), Some(-1.0)]);
        hidden.style.hidden = true;

        let chart = ChartData::new(
            vec![0.0, 1.0],
            vec![
                dataset("a", &[Some(-1.0), Some(1.0)]),
                hidden,
                dataset("gap", &[None, Some(0.0)]),
            ],
        );
        assert!(detect_intersections(&chart).is_empty());
    }

    #[test]
    fn test_pairs_are_reported_separately() {
        let chart = ChartData::new(
            vec![-1.0, 1.0],
            vec![
                dataset("a", &[Some(-1.0), Some(1.0)]),
                dataset("b", &[Some(1.0), Some(-1.0)]),
                dataset("c", &[Some(0.0), Some(0.0)]),
            ],
        );

        let points = detect_intersections(&chart);
        let pairs: Vec<[usize; 2]> = points.iter().map(|p| p.dataset_indices).collect();
        assert_eq!(pairs, vec![[0, 1], [0, 2], [1, 2]]);
        assert!(points.iter().all(|p| p.x == 0.0 && p.y == 0.0));
    }
}

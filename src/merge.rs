//! Merging two charts onto one label axis.
use std::collections::{HashMap, HashSet};

use crate::{
    chart::{ChartData, ChartDataset},
    value::{label_key, round_label},
};

/// Merges two charts into one.
///
/// Labels of both inputs are rounded to 6 decimals, de-duplicated and sorted. Every dataset
/// of `primary`, then every dataset of `secondary`, is re-aligned on the merged axis:
/// values are copied at labels the dataset already had, and every other label is a gap.
/// No interpolation happens here. Styling is carried over unchanged.
///
/// ```rust
/// # use plotfit::{chart::{ChartData, ChartDataset, DatasetStyle}, merge::merge};
/// let a = ChartData::new(vec![0.0, 1.0, 2.0], vec![ChartDataset::new("a", vec![Some(0.0), Some(1.0), Some(2.0)], DatasetStyle::default())]);
/// let b = ChartData::new(vec![0.5, 1.5], vec![ChartDataset::new("b", vec![Some(5.0), Some(6.0)], DatasetStyle::default())]);
///
/// let merged = merge(&a, &b);
/// assert_eq!(merged.labels, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
/// assert_eq!(merged.datasets[1].data, vec![None, Some(5.0), None, Some(6.0), None]);
/// ```
#[must_use]
pub fn merge(primary: &ChartData, secondary: &ChartData) -> ChartData {
    let mut seen = HashSet::new();
    let mut labels: Vec<f64> = primary
        .labels
        .iter()
        .chain(&secondary.labels)
        .filter(|label| label.is_finite())
        .map(|&label| round_label(label))
        .filter(|&label| seen.insert(label_key(label)))
        .collect();
    labels.sort_by(f64::total_cmp);

    let mut datasets = Vec::with_capacity(primary.datasets.len() + secondary.datasets.len());
    for chart in [primary, secondary] {
        datasets.extend(
            chart
                .datasets
                .iter()
                .map(|dataset| realign(dataset, &chart.labels, &labels)),
        );
    }

    ChartData { labels, datasets }
}

/// Re-projects `dataset`, drawn over `source`, onto `labels`.
fn realign(dataset: &ChartDataset, source: &[f64], labels: &[f64]) -> ChartDataset {
    let mut values = HashMap::with_capacity(source.len());
    for (label, value) in source.iter().zip(&dataset.data) {
        if label.is_finite() {
            values.insert(label_key(*label), *value);
        }
    }

    ChartDataset {
        data: labels
            .iter()
            .map(|label| values.get(&label_key(*label)).copied().flatten())
            .collect(),
        ..dataset.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::DatasetStyle;

    fn chart(labels: Vec<f64>, name: &str, data: Vec<Option<f64>>) -> ChartData {
        ChartData::new(labels, vec![ChartDataset::new(name, data, DatasetStyle::default())])
    }

    #[test]
    fn test_merge_interleaved_labels() {
        let a = chart(vec![0.0, 1.0, 2.0], "a", vec![Some(0.0), Some(1.0), Some(4.0)]);
        let b = chart(vec![0.5, 1.5], "b", vec![Some(-1.0), None]);

        let merged = merge(&a, &b);
        assert_eq!(merged.labels, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(merged.datasets.len(), 2);
        assert_eq!(merged.datasets[0].data, vec![Some(0.0), None, Some(1.0), None, Some(4.0)]);
        assert_eq!(merged.datasets[1].data, vec![None, Some(-1.0), None, None, None]);
        assert!(merged.datasets.iter().all(|d| d.data.len() == merged.labels.len()));
    }

    #[test]
    fn test_merge_matches_after_rounding() {
        let a = chart(vec![0.1 + 0.2], "a", vec![Some(1.0)]);
        let b = chart(vec![0.3, f64::NAN], "b", vec![Some(2.0), Some(3.0)]);

        let merged = merge(&a, &b);
        assert_eq!(merged.labels, vec![0.3]);
        assert_eq!(merged.datasets[0].data, vec![Some(1.0)]);
        assert_eq!(merged.datasets[1].data, vec![Some(2.0)]);
    }

    #[test]
    fn test_merge_keeps_style() {
        let style = DatasetStyle {
            border_color: "#ef4444".to_string(),
            border_dash: vec![6.0, 4.0],
            ..DatasetStyle::default()
        };
        let a = ChartData::new(vec![1.0], vec![ChartDataset::new("a", vec![Some(1.0)], style.clone())]);

        let merged = merge(&a, &ChartData::default());
        assert_eq!(merged.datasets[0].style, style);
        assert_eq!(merged.datasets[0].label, "a");
    }

    #[test]
    fn test_merge_empty() {
        let merged = merge(&ChartData::default(), &ChartData::default());
        assert!(merged.is_empty());
    }
}

//! Chart data handed to a rendering sink.
//!
//! A [`ChartData`] is a shared label axis plus any number of [`ChartDataset`]s whose
//! values line up with it one-to-one. Gaps are `None`, and serialize as `null`.
//!
//! ```rust
//! use plotfit::chart::{ChartData, ChartDataset, DatasetStyle};
//!
//! let chart = ChartData::new(
//!     vec![0.0, 1.0, 2.0],
//!     vec![ChartDataset::new("f(x) = x", vec![Some(0.0), None, Some(2.0)], DatasetStyle::default())],
//! );
//!
//! let bounds = chart.bounds().unwrap();
//! assert_eq!((bounds.x_min, bounds.x_max), (0.0, 2.0));
//! ```
use serde::{Deserialize, Serialize};

use crate::{value::min_max, viewport::Bounds};

/// Drawing attributes of one dataset. Passed through the pipeline untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetStyle {
    /// Line colour, `#rrggbb`
    pub border_color: String,

    /// Fill colour, usually `rgba(...)`
    pub background_color: String,

    /// Marker radius
    pub point_radius: f64,

    /// Marker radius under the cursor
    pub point_hover_radius: f64,

    /// Line width
    pub border_width: f64,

    /// Bezier tension, 0 for straight segments
    pub tension: f64,

    /// Fill between the line and the x axis
    pub fill: bool,

    /// Hidden datasets stay in the data but are not drawn
    pub hidden: bool,

    /// Draw across `None` gaps
    pub span_gaps: bool,

    /// Dash pattern, empty for a solid line
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub border_dash: Vec<f64>,
}

/// One drawable series, aligned with [`ChartData::labels`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    /// Legend text
    pub label: String,

    /// One value per label
    pub data: Vec<Option<f64>>,

    /// Drawing attributes
    #[serde(flatten)]
    pub style: DatasetStyle,
}
impl ChartDataset {
    /// Creates a dataset.
    #[must_use]
    pub fn new(label: impl Into<String>, data: Vec<Option<f64>>, style: DatasetStyle) -> Self {
        Self {
            label: label.into(),
            data,
            style,
        }
    }

    /// True if the dataset is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.style.hidden
    }

    /// Finite values, skipping gaps.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flatten().copied().filter(|v| v.is_finite())
    }
}

/// Labels plus the datasets drawn over them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Strictly increasing x labels
    pub labels: Vec<f64>,

    /// Datasets, each holding one value per label
    pub datasets: Vec<ChartDataset>,
}
impl ChartData {
    /// Creates chart data.
    #[must_use]
    pub fn new(labels: Vec<f64>, datasets: Vec<ChartDataset>) -> Self {
        Self { labels, datasets }
    }

    /// True if there are no labels and no datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.datasets.is_empty()
    }

    /// Datasets that are not hidden, with their index.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &ChartDataset)> {
        self.datasets
            .iter()
            .enumerate()
            .filter(|(_, dataset)| !dataset.is_hidden())
    }

    /// Full extent of the chart: finite labels on x, finite values of every dataset on y.
    ///
    /// `None` without at least one finite label and one finite value.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let x = min_max(self.labels.iter().copied().filter(|x| x.is_finite()))?;
        let y = min_max(self.datasets.iter().flat_map(ChartDataset::values))?;
        Some(Bounds::new(x, y))
    }
}

//! Input series: analytic functions and point datasets.
//!
//! Series are owned by the caller and handed to the pipeline whole on every plot.
//! Nothing here is mutated by plotting; [`DataSeries::normalized`] builds a separate view.
use serde::{Deserialize, Deserializer, Serialize};

use crate::{dataset::NormalizedSeries, fit::FitConfig};

/// A function of `x` typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSeries {
    /// Identifier
    pub id: String,

    /// Short name, e.g. `f1`
    pub label: String,

    /// Expression text, compiled lazily
    pub expression: String,

    /// Line colour, `#rrggbb`
    pub color: String,

    /// Whether the series is drawn
    #[serde(default = "visible")]
    pub visible: bool,
}
impl FunctionSeries {
    /// A visible function series.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        expression: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            expression: expression.into(),
            color: color.into(),
            visible: true,
        }
    }
}

/// One raw point of a dataset.
///
/// Coordinates may arrive as numbers or as text; text that does not parse becomes `NaN`
/// and is dropped when the series is normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Identifier
    #[serde(default)]
    pub id: String,

    /// Horizontal coordinate
    #[serde(deserialize_with = "lenient_f64")]
    pub x: f64,

    /// Vertical coordinate
    #[serde(deserialize_with = "lenient_f64")]
    pub y: f64,
}
impl DataPoint {
    /// A point without an identifier.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: String::new(),
            x,
            y,
        }
    }
}
impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

/// A series of measured points, optionally with a fitted curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSeries {
    /// Identifier
    pub id: String,

    /// Display name
    pub label: String,

    /// Line colour, `#rrggbb`
    pub color: String,

    /// Whether the series is drawn
    #[serde(default = "visible")]
    pub visible: bool,

    /// Points in user order
    #[serde(default)]
    pub points: Vec<DataPoint>,

    /// Requested fit, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitConfig>,
}
impl DataSeries {
    /// A visible series without a fit.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        color: impl Into<String>,
        points: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
            visible: true,
            points: points.into_iter().map(DataPoint::from).collect(),
            fit: None,
        }
    }

    /// Requests a fit for this series.
    #[must_use]
    pub fn with_fit(mut self, fit: FitConfig) -> Self {
        self.fit = Some(fit);
        self
    }

    /// Raw coordinates in user order.
    pub fn coordinates(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().map(|p| (p.x, p.y))
    }

    /// Sorted, de-duplicated view of the points.
    #[must_use]
    pub fn normalized(&self) -> NormalizedSeries {
        NormalizedSeries::new(self.coordinates())
    }
}

fn visible() -> bool {
    true
}

//! Plot configuration: the domain, display options and series of one plot request.
//!
//! Everything derives `serde` with camelCase keys, so a whole session can be loaded from JSON.
//! Missing fields fall back to their defaults.
//!
//! ```rust
//! use plotfit::config::PlotRequest;
//!
//! let request = PlotRequest::from_json(r##"{
//!     "domain": { "minX": -2, "maxX": 2 },
//!     "functions": [{ "id": "f", "label": "f", "expression": "x^2", "color": "#2563eb" }]
//! }"##).unwrap();
//!
//! assert_eq!(request.domain.step, 0.1);
//! assert_eq!(request.functions.len(), 1);
//! assert!(request.options.show_points);
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    palette::PALETTE,
    series::{DataSeries, FunctionSeries},
};

/// Sampled x domain of function plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainSettings {
    /// Left edge
    pub min_x: f64,

    /// Right edge
    pub max_x: f64,

    /// Distance between samples
    pub step: f64,
}
impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            min_x: -10.0,
            max_x: 10.0,
            step: 0.1,
        }
    }
}
impl DomainSettings {
    /// Creates domain settings.
    #[must_use]
    pub fn new(min_x: f64, max_x: f64, step: f64) -> Self {
        Self { min_x, max_x, step }
    }
}

/// How the chart is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartDisplayOptions {
    /// Draw grid lines
    pub show_grid: bool,

    /// Draw point markers
    pub show_points: bool,

    /// Smooth lines between points
    pub smooth_curve: bool,

    /// Draw the legend
    pub show_legend: bool,

    /// Fill under curves, and report their area
    pub fill_area: bool,

    /// Keep the chart's aspect ratio when resizing
    pub maintain_aspect_ratio: bool,

    /// Chart caption
    pub chart_title: String,
}
impl Default for ChartDisplayOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_points: true,
            smooth_curve: false,
            show_legend: true,
            fill_area: false,
            maintain_aspect_ratio: true,
            chart_title: "Function plot".to_string(),
        }
    }
}

/// Everything needed to produce one plot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlotRequest {
    /// Domain for function series
    pub domain: DomainSettings,

    /// Display options
    pub options: ChartDisplayOptions,

    /// Function series
    pub functions: Vec<FunctionSeries>,

    /// Data series
    pub datasets: Vec<DataSeries>,
}
impl PlotRequest {
    /// Parses a request from JSON text.
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] if the text is not a valid request.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a request from a JSON file.
    ///
    /// # Errors
    /// Returns [`crate::Error::Io`] if the file cannot be read, or [`crate::Error::Json`]
    /// if it is not a valid request.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading plot request");
        Self::from_json(&text)
    }
}

/// A ready-made function offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Menu text
    pub label: &'static str,

    /// Expression inserted when picked
    pub expression: &'static str,
}

/// Ready-made functions, in menu order.
pub const PRESETS: [Preset; 13] = [
    Preset { label: "Quadratic (x^2)", expression: "x^2" },
    Preset { label: "Cubic (x^3 - 3x)", expression: "x^3 - 3*x" },
    Preset { label: "Linear (2x + 1)", expression: "2*x + 1" },
    Preset { label: "Sine (sin(x))", expression: "sin(x)" },
    Preset { label: "Cosine (cos(x))", expression: "cos(x)" },
    Preset { label: "Tangent (tan(x))", expression: "tan(x)" },
    Preset { label: "Exponential (e^x)", expression: "e^x" },
    Preset { label: "Logarithm (log(x))", expression: "log(x)" },
    Preset { label: "Natural Log (ln(x))", expression: "ln(x)" },
    Preset { label: "Square Root (sqrt(x))", expression: "sqrt(x)" },
    Preset { label: "Absolute Value (abs(x))", expression: "abs(x)" },
    Preset { label: "Gaussian (e^(-x^2))", expression: "e^(-x^2)" },
    Preset { label: "Sinc (sin(x)/x)", expression: "sin(x)/x" },
];

/// The function a new session starts with: `f1(x) = x^2`.
#[must_use]
pub fn default_function() -> FunctionSeries {
    FunctionSeries::new("func-1", "f1", "x^2", PALETTE[0])
}

//! Functions and tools for evaluating polynomial fits and describing series
//!
//! # Model Fit
//! - [`r_squared`]: Proportion of variance explained by the model. Higher is better (0 to 1).
//! - [`root_mean_squared_error`]: Typical size of a residual, in `y` units. Lower is better.
//! - [`FitMetrics`]: Both of the above, computed in one pass over the finite predictions.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`SeriesStats`]: Per-series point counts and extents reported alongside chart data.
//!
//! Both metrics are `None` rather than NaN when they cannot be computed:
//! - no prediction is finite, or
//! - for R², the observed values have (almost) no variance.
use serde::Serialize;

use crate::fit::FitSummary;

/// `SS_tot` at or below this makes R² undefined.
pub const VARIANCE_THRESHOLD: f64 = 1e-9;

/// Computes the arithmetic mean of a sequence of values. `None` if empty.
///
/// ```rust
/// # use plotfit::statistics::mean;
/// assert_eq!(mean([1.0, 2.0, 6.0].into_iter()), Some(3.0));
/// assert_eq!(mean(std::iter::empty()), None);
/// ```
pub fn mean(data: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = data.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Goodness-of-fit metrics of a model against observed data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitMetrics {
    /// Coefficient of determination
    pub r_squared: Option<f64>,

    /// Root mean squared error
    pub rmse: Option<f64>,
}
impl FitMetrics {
    /// Computes R² and RMSE over the pairs whose prediction is finite.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// R²   = 1 - (SS_res / SS_tot)
    /// RMSE = sqrt(SS_res / n)
    /// where
    ///   SS_res = Σ (y_i - y_fit_i)²
    ///   SS_tot = Σ (y_i - y_mean)²
    /// ```
    /// </div>
    pub fn new(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> Self {
        let pairs: Vec<(f64, f64)> = y.zip(y_fit).filter(|(_, fit)| fit.is_finite()).collect();

        let Some(y_mean) = mean(pairs.iter().map(|(y, _)| *y)) else {
            return Self::default();
        };

        let (ss_res, ss_tot) = pairs.iter().fold((0.0, 0.0), |(res, tot), (y, fit)| {
            let residual = y - fit;
            let deviation = y - y_mean;
            (res + residual * residual, tot + deviation * deviation)
        });

        let r_squared = if ss_tot <= VARIANCE_THRESHOLD {
            None
        } else {
            Some(1.0 - ss_res / ss_tot)
        };
        let rmse = (ss_res / pairs.len() as f64).sqrt();

        Self {
            r_squared: r_squared.filter(|v| v.is_finite()),
            rmse: rmse.is_finite().then_some(rmse),
        }
    }
}

/// Computes the coefficient of determination (R²).
///
/// - `1` means the model explains all the variation.
/// - `0` means it does no better than the mean.
/// - Negative values are possible for models worse than the mean.
///
/// # Example
/// ```rust
/// # use plotfit::statistics::r_squared;
/// let y = vec![1.0, 2.0, 3.0];
/// let y_fit = vec![1.1, 1.9, 3.05];
/// let r2 = r_squared(y.into_iter(), y_fit.into_iter()).unwrap();
/// assert!(r2 > 0.98);
/// ```
pub fn r_squared(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> Option<f64> {
    FitMetrics::new(y, y_fit).r_squared
}

/// Computes the root mean squared error.
///
/// # Example
/// ```rust
/// # use plotfit::statistics::root_mean_squared_error;
/// let y = vec![1.0, 2.0];
/// let y_fit = vec![2.0, 1.0];
/// assert_eq!(root_mean_squared_error(y.into_iter(), y_fit.into_iter()), Some(1.0));
/// ```
pub fn root_mean_squared_error(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
) -> Option<f64> {
    FitMetrics::new(y, y_fit).rmse
}

/// Per-series summary reported with every plot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStats {
    /// Series identifier
    pub id: String,

    /// Display label
    pub label: String,

    /// Whether the series is drawn
    pub visible: bool,

    /// Number of usable points
    pub valid_points: usize,

    /// Smallest `x` among usable points
    pub min_x: Option<f64>,

    /// Largest `x` among usable points
    pub max_x: Option<f64>,

    /// Smallest `y` among usable points
    pub min_y: Option<f64>,

    /// Largest `y` among usable points
    pub max_y: Option<f64>,

    /// Trapezoidal area, when the chart fills under curves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_under_curve: Option<f64>,

    /// Summary of the fitted curve, if one was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitSummary>,
}
impl SeriesStats {
    /// Empty stats for a series.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, visible: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            visible,
            ..Self::default()
        }
    }

    /// Folds one usable point into the counts and extents.
    pub fn record(&mut self, x: f64, y: f64) {
        self.valid_points += 1;
        self.min_x = Some(self.min_x.map_or(x, |v| v.min(x)));
        self.max_x = Some(self.max_x.map_or(x, |v| v.max(x)));
        self.min_y = Some(self.min_y.map_or(y, |v| v.min(y)));
        self.max_y = Some(self.max_y.map_or(y, |v| v.max(y)));
    }
}

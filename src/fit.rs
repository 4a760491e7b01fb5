//! Least-squares polynomial curve fitting for data series.
//!
//! [`polynomial_regression`] solves the normal equations for a single degree.
//! [`CurveFit`] wraps one such solve with everything a chart needs: the fit domain,
//! goodness-of-fit metrics, the equation text and the x values to draw the curve at.
//! [`fit_series`] applies a [`FitConfig`] to a series, trying every degree when the
//! requested type is [`FitType::Auto`].
//!
//! ```rust
//! use plotfit::fit::{fit_series, FitConfig, FitType, PolynomialKind};
//!
//! let points: Vec<(f64, f64)> = (0..6).map(|i| (f64::from(i), 2.0 * f64::from(i) + 1.0)).collect();
//! let fit = fit_series("Samples", &points, &FitConfig::new(FitType::Auto)).unwrap();
//!
//! assert_eq!(fit.resolved(), PolynomialKind::Linear);
//! assert_eq!(fit.legend(), "Auto (best polynomial): Linear fit");
//! ```
use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    statistics::FitMetrics,
    value::linspace,
    Polynomial,
};

/// Smallest number of samples drawn along a fitted curve.
pub const MIN_SAMPLE_COUNT: usize = 20;

/// Largest number of samples drawn along a fitted curve.
pub const MAX_SAMPLE_COUNT: usize = 600;

/// Samples drawn along a fitted curve when none is requested.
pub const DEFAULT_SAMPLE_COUNT: usize = 120;

/// Pivots and elimination factors at or below this magnitude are treated as zero.
pub const PIVOT_THRESHOLD: f64 = 1e-12;

/// Domains narrower than this cannot be fitted; fit curves also extend this far past their domain.
pub const DOMAIN_TOLERANCE: f64 = 1e-9;

/// Metric differences at or below this are ties during auto selection.
pub const SELECTION_TOLERANCE: f64 = 1e-9;

/// A concrete polynomial fit, degree 1 through 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolynomialKind {
    /// Degree 1
    Linear,

    /// Degree 2
    Quadratic,

    /// Degree 3
    Cubic,

    /// Degree 4
    Quartic,

    /// Degree 5
    Quintic,
}
impl PolynomialKind {
    /// Every kind, lowest degree first. Auto mode tries them in this order.
    pub const ALL: [Self; 5] = [
        Self::Linear,
        Self::Quadratic,
        Self::Cubic,
        Self::Quartic,
        Self::Quintic,
    ];

    /// Polynomial degree of this kind.
    #[must_use]
    pub const fn degree(self) -> usize {
        match self {
            Self::Linear => 1,
            Self::Quadratic => 2,
            Self::Cubic => 3,
            Self::Quartic => 4,
            Self::Quintic => 5,
        }
    }

    /// Legend label, e.g. `Quadratic fit`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linear => "Linear fit",
            Self::Quadratic => "Quadratic fit",
            Self::Cubic => "Cubic fit",
            Self::Quartic => "Quartic fit",
            Self::Quintic => "Quintic fit",
        }
    }

    /// Lower-cased label used inside warning messages.
    fn noun(self) -> String {
        self.label().to_lowercase()
    }
}
impl Display for PolynomialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Fit requested for a series: one polynomial kind, or the best of all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitType {
    /// Straight line
    #[default]
    Linear,

    /// Degree 2
    Quadratic,

    /// Degree 3
    Cubic,

    /// Degree 4
    Quartic,

    /// Degree 5
    Quintic,

    /// Whichever degree fits best
    Auto,
}
impl FitType {
    /// Every fit type, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Linear,
        Self::Quadratic,
        Self::Cubic,
        Self::Quartic,
        Self::Quintic,
        Self::Auto,
    ];

    /// Menu label, e.g. `Cubic (degree 3)`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linear => "Linear (degree 1)",
            Self::Quadratic => "Quadratic (degree 2)",
            Self::Cubic => "Cubic (degree 3)",
            Self::Quartic => "Quartic (degree 4)",
            Self::Quintic => "Quintic (degree 5)",
            Self::Auto => "Auto (best polynomial)",
        }
    }

    /// The concrete kind, or `None` for [`FitType::Auto`].
    #[must_use]
    pub const fn kind(self) -> Option<PolynomialKind> {
        match self {
            Self::Linear => Some(PolynomialKind::Linear),
            Self::Quadratic => Some(PolynomialKind::Quadratic),
            Self::Cubic => Some(PolynomialKind::Cubic),
            Self::Quartic => Some(PolynomialKind::Quartic),
            Self::Quintic => Some(PolynomialKind::Quintic),
            Self::Auto => None,
        }
    }

    /// Lower-case identifier, as used in JSON and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
            Self::Quartic => "quartic",
            Self::Quintic => "quintic",
            Self::Auto => "auto",
        }
    }
}
impl From<PolynomialKind> for FitType {
    fn from(kind: PolynomialKind) -> Self {
        match kind {
            PolynomialKind::Linear => Self::Linear,
            PolynomialKind::Quadratic => Self::Quadratic,
            PolynomialKind::Cubic => Self::Cubic,
            PolynomialKind::Quartic => Self::Quartic,
            PolynomialKind::Quintic => Self::Quintic,
        }
    }
}
impl FromStr for FitType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|t| t.name()).collect();
                format!("unknown fit type `{s}`, expected one of: {}", names.join(", "))
            })
    }
}
impl Display for FitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Fit settings attached to a data series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FitConfig {
    /// Requested fit
    #[serde(rename = "type")]
    pub fit_type: FitType,

    /// Requested number of curve samples, clamped by [`clamp_sample_count`]
    pub sample_count: f64,
}
impl Default for FitConfig {
    fn default() -> Self {
        Self {
            fit_type: FitType::default(),
            sample_count: DEFAULT_SAMPLE_COUNT as f64,
        }
    }
}
impl FitConfig {
    /// A config for `fit_type` with the default sample count.
    #[must_use]
    pub fn new(fit_type: FitType) -> Self {
        Self {
            fit_type,
            ..Self::default()
        }
    }

    /// The sample count actually used.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        clamp_sample_count(self.sample_count)
    }
}

/// Floors a requested sample count into `[MIN_SAMPLE_COUNT, MAX_SAMPLE_COUNT]`.
///
/// Non-finite requests fall back to [`DEFAULT_SAMPLE_COUNT`].
///
/// ```
/// # use plotfit::fit::clamp_sample_count;
/// assert_eq!(clamp_sample_count(5.0), 20);
/// assert_eq!(clamp_sample_count(150.7), 150);
/// assert_eq!(clamp_sample_count(1e6), 600);
/// assert_eq!(clamp_sample_count(f64::NAN), 120);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn clamp_sample_count(value: f64) -> usize {
    if !value.is_finite() {
        return DEFAULT_SAMPLE_COUNT;
    }

    let value = value.floor().clamp(MIN_SAMPLE_COUNT as f64, MAX_SAMPLE_COUNT as f64);
    value as usize
}

/// Fits a polynomial of the given degree to `points` by least squares.
///
/// Builds the `(degree + 1)`-square normal equations from power sums of `x`, then
/// solves them by Gauss-Jordan elimination with partial pivoting.
///
/// # Errors
/// - [`Error::InvalidDegree`] if `degree` is 0
/// - [`Error::NotEnoughPoints`] if there are fewer than `degree + 1` points
/// - [`Error::SingularSystem`] if a column has no pivot larger than [`PIVOT_THRESHOLD`]
///
/// # Example
/// ```
/// # use plotfit::fit::polynomial_regression;
/// let data = [(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
/// let poly = polynomial_regression(&data, 2).unwrap();
/// assert!((poly.y(3.0) - 13.0).abs() < 1e-9);
/// ```
pub fn polynomial_regression(points: &[(f64, f64)], degree: usize) -> Result<Polynomial<'static>> {
    if degree < 1 {
        return Err(Error::InvalidDegree(degree));
    }

    let size = degree + 1;
    if points.len() < size {
        return Err(Error::NotEnoughPoints {
            required: size,
            degree,
        });
    }

    // Σx^k for k in 0..=2d, and Σx^k·y for k in 0..=d
    let mut sums = vec![0.0; 2 * degree + 1];
    let mut sums_y = vec![0.0; size];
    for &(x, y) in points {
        let mut power = 1.0;
        for sum in &mut sums {
            *sum += power;
            power *= x;
        }

        let mut power = 1.0;
        for sum in &mut sums_y {
            *sum += y * power;
            power *= x;
        }
    }

    let mut system = DMatrix::from_fn(size, size + 1, |row, col| {
        if col == size {
            sums_y[row]
        } else {
            sums[row + col]
        }
    });

    solve_augmented(&mut system)?;
    let coefficients = system.column(size).iter().copied().collect();
    Ok(Polynomial::owned(coefficients))
}

/// Reduces an `n × (n + 1)` augmented matrix in place until its left block is the identity.
fn solve_augmented(system: &mut DMatrix<f64>) -> Result<()> {
    let size = system.nrows();

    for pivot in 0..size {
        let mut max_row = pivot;
        let mut max_value = system[(pivot, pivot)].abs();
        for row in pivot + 1..size {
            let candidate = system[(row, pivot)].abs();
            if candidate > max_value {
                max_value = candidate;
                max_row = row;
            }
        }

        if max_value.is_nan() || max_value <= PIVOT_THRESHOLD {
            return Err(Error::SingularSystem);
        }

        if max_row != pivot {
            system.swap_rows(pivot, max_row);
        }

        let pivot_value = system[(pivot, pivot)];
        for col in pivot..=size {
            system[(pivot, col)] /= pivot_value;
        }

        for row in 0..size {
            if row == pivot {
                continue;
            }

            let factor = system[(row, pivot)];
            if factor.abs() <= PIVOT_THRESHOLD {
                continue;
            }

            for col in pivot..=size {
                let value = system[(pivot, col)];
                system[(row, col)] -= factor * value;
            }
        }
    }

    Ok(())
}

/// One polynomial fit of a series, with the data needed to draw and describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit {
    kind: PolynomialKind,
    function: Polynomial<'static>,
    domain: RangeInclusive<f64>,
    sample_count: usize,
    equation: String,
    metrics: FitMetrics,
    sample_xs: Vec<f64>,
}
impl CurveFit {
    /// Fits `kind` to the unique, x-sorted points of the series called `series`.
    ///
    /// The fit domain runs from the first to the last point. `sample_count` x values
    /// spanning the domain are kept for drawing the curve.
    ///
    /// # Errors
    /// - [`Error::InsufficientPoints`] with fewer than `degree + 1` points
    /// - [`Error::DegenerateDomain`] if the domain is narrower than [`DOMAIN_TOLERANCE`]
    /// - [`Error::FitFailed`] wrapping the regression failure
    pub fn new(
        series: &str,
        points: &[(f64, f64)],
        kind: PolynomialKind,
        sample_count: usize,
    ) -> Result<Self> {
        let required = kind.degree() + 1;
        let insufficient = || Error::InsufficientPoints {
            series: series.to_string(),
            required,
            fit: kind.noun(),
        };
        if points.len() < required {
            return Err(insufficient());
        }

        let &[(min, _), .., (max, _)] = points else {
            return Err(insufficient());
        };
        if !min.is_finite() || !max.is_finite() || (max - min).abs() <= DOMAIN_TOLERANCE {
            return Err(Error::DegenerateDomain {
                series: series.to_string(),
            });
        }

        let function =
            polynomial_regression(points, kind.degree()).map_err(|e| Error::FitFailed {
                series: series.to_string(),
                fit: kind.noun(),
                source: Box::new(e),
            })?;

        Ok(Self {
            kind,
            equation: function.equation(),
            metrics: function.metrics(points),
            sample_xs: linspace(min, max, sample_count),
            domain: min..=max,
            sample_count,
            function,
        })
    }

    /// Polynomial kind of this fit.
    #[must_use]
    pub fn kind(&self) -> PolynomialKind {
        self.kind
    }

    /// Degree of the fitted polynomial.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.kind.degree()
    }

    /// The fitted polynomial.
    #[must_use]
    pub fn function(&self) -> &Polynomial<'static> {
        &self.function
    }

    /// Coefficients, lowest degree first. Always `degree + 1` of them.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        self.function.coefficients()
    }

    /// Range of x the fit was computed over.
    #[must_use]
    pub fn domain(&self) -> RangeInclusive<f64> {
        self.domain.clone()
    }

    /// Number of samples requested along the curve.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Human-readable equation, e.g. `y = 1.0000 + 2.0000·x`.
    #[must_use]
    pub fn equation(&self) -> &str {
        &self.equation
    }

    /// R² and RMSE against the fitted points.
    #[must_use]
    pub fn metrics(&self) -> FitMetrics {
        self.metrics
    }

    /// Evenly spaced x values covering the domain, for drawing the curve.
    #[must_use]
    pub fn sample_xs(&self) -> &[f64] {
        &self.sample_xs
    }

    /// True if `x` lies inside the domain, give or take [`DOMAIN_TOLERANCE`].
    #[must_use]
    pub fn covers(&self, x: f64) -> bool {
        x >= self.domain.start() - DOMAIN_TOLERANCE && x <= self.domain.end() + DOMAIN_TOLERANCE
    }

    /// Value of the curve at `x`, or `None` outside the domain or when not finite.
    #[must_use]
    pub fn y(&self, x: f64) -> Option<f64> {
        if !self.covers(x) {
            return None;
        }

        let y = self.function.y(x);
        y.is_finite().then_some(y)
    }

    /// Curve values aligned with `labels`.
    #[must_use]
    pub fn project(&self, labels: &[f64]) -> Vec<Option<f64>> {
        labels.iter().map(|&x| self.y(x)).collect()
    }

    /// Auto-mode ordering: higher R², then lower RMSE, then lower degree.
    ///
    /// Differences within [`SELECTION_TOLERANCE`] count as ties. A missing R² ranks
    /// below every value, a missing RMSE above every value.
    #[must_use]
    pub fn is_better_than(&self, other: &Self) -> bool {
        let r2 = self.metrics.r_squared.unwrap_or(f64::NEG_INFINITY);
        let other_r2 = other.metrics.r_squared.unwrap_or(f64::NEG_INFINITY);
        if (r2 - other_r2).abs() > SELECTION_TOLERANCE {
            return r2 > other_r2;
        }

        let rmse = self.metrics.rmse.unwrap_or(f64::INFINITY);
        let other_rmse = other.metrics.rmse.unwrap_or(f64::INFINITY);
        if (rmse - other_rmse).abs() > SELECTION_TOLERANCE {
            return rmse < other_rmse;
        }

        self.degree() < other.degree()
    }
}

/// The fit computed for one series under a [`FitConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    selected: FitType,
    curve: CurveFit,
}
impl FitResult {
    /// The fit type that was asked for.
    #[must_use]
    pub fn selected(&self) -> FitType {
        self.selected
    }

    /// The kind actually fitted. Never auto.
    #[must_use]
    pub fn resolved(&self) -> PolynomialKind {
        self.curve.kind()
    }

    /// The underlying curve.
    #[must_use]
    pub fn curve(&self) -> &CurveFit {
        &self.curve
    }

    /// Legend text: the fit label, prefixed with the auto label when auto-selected.
    #[must_use]
    pub fn legend(&self) -> String {
        let resolved = self.resolved().label();
        match self.selected {
            FitType::Auto => format!("{}: {resolved}", FitType::Auto.label()),
            _ => resolved.to_string(),
        }
    }

    /// Serializable summary for reporting.
    #[must_use]
    pub fn summary(&self) -> FitSummary {
        FitSummary {
            selected_type: self.selected,
            resolved_type: self.resolved(),
            coefficients: self.curve.coefficients().to_vec(),
            domain: FitDomain::from(self.curve.domain()),
            sample_count: self.curve.sample_count(),
            equation: self.curve.equation().to_string(),
            r_squared: self.curve.metrics().r_squared,
            rmse: self.curve.metrics().rmse,
        }
    }
}

/// Reported description of a series fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitSummary {
    /// Fit type that was requested
    pub selected_type: FitType,

    /// Kind that was fitted
    pub resolved_type: PolynomialKind,

    /// Coefficients, lowest degree first
    pub coefficients: Vec<f64>,

    /// X range the fit was computed over, and is drawn on
    pub domain: FitDomain,

    /// Curve samples drawn
    pub sample_count: usize,

    /// Equation text
    pub equation: String,

    /// Coefficient of determination
    pub r_squared: Option<f64>,

    /// Root mean squared error
    pub rmse: Option<f64>,
}

/// Closed x interval of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitDomain {
    /// Smallest fitted x
    pub min: f64,

    /// Largest fitted x
    pub max: f64,
}
impl From<RangeInclusive<f64>> for FitDomain {
    fn from(range: RangeInclusive<f64>) -> Self {
        let (min, max) = range.into_inner();
        Self { min, max }
    }
}

/// Fits a series according to `config`.
///
/// `points` must be the unique points of the series in ascending `x` order, as produced
/// by [`crate::dataset::NormalizedSeries::points`].
///
/// In auto mode every [`PolynomialKind`] is attempted independently, and the best
/// success under [`CurveFit::is_better_than`] wins. Earlier kinds win ties.
///
/// # Errors
/// The error of the single attempt, or in auto mode the error of the first failed
/// attempt when none succeeded.
pub fn fit_series(series: &str, points: &[(f64, f64)], config: &FitConfig) -> Result<FitResult> {
    let sample_count = config.sample_count();

    let curve = match config.fit_type.kind() {
        Some(kind) => attempt(series, points, kind, sample_count)?,
        None => {
            let mut best: Option<CurveFit> = None;
            let mut first_error = None;

            for kind in PolynomialKind::ALL {
                match attempt(series, points, kind, sample_count) {
                    Ok(curve) => match &best {
                        Some(current) if !curve.is_better_than(current) => {}
                        _ => best = Some(curve),
                    },
                    Err(e) => {
                        first_error.get_or_insert(e);
                    }
                }
            }

            match (best, first_error) {
                (Some(curve), _) => curve,
                (None, Some(e)) => return Err(e),
                (None, None) => {
                    return Err(Error::NoFitCandidates {
                        series: series.to_string(),
                    })
                }
            }
        }
    };

    tracing::debug!(
        series,
        selected = config.fit_type.name(),
        resolved = curve.kind().label(),
        r_squared = ?curve.metrics().r_squared,
        "series fitted"
    );

    Ok(FitResult {
        selected: config.fit_type,
        curve,
    })
}

fn attempt(
    series: &str,
    points: &[(f64, f64)],
    kind: PolynomialKind,
    sample_count: usize,
) -> Result<CurveFit> {
    let result = CurveFit::new(series, points, kind, sample_count);
    if let Err(e) = &result {
        tracing::debug!(series, fit = kind.label(), error = %e, "fit attempt failed");
    }
    result
}

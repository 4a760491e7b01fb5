use std::{borrow::Cow, ops::RangeInclusive};

use crate::{
    display,
    statistics::{self, FitMetrics},
    value::{linspace, CoordExt},
};

/// A polynomial in the monomial basis, `y(x) = c0 + c1·x + c2·x² + ...`.
///
/// Coefficients are stored low-to-high. The polynomial is a plain function of `x`;
/// it carries no dataset, and can be evaluated anywhere.
///
/// # Example
/// ```
/// # use plotfit::Polynomial;
/// let poly = Polynomial::borrowed(&[1.0, 2.0, 3.0]); // 1 + 2x + 3x^2
/// assert_eq!(poly.y(2.0), 17.0);
/// assert_eq!(poly.degree(), 2);
/// assert_eq!(poly.equation(), "y = 1.0000 + 2.0000·x + 3.0000·x^2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial<'a> {
    coefficients: Cow<'a, [f64]>,
}
impl<'a> Polynomial<'a> {
    /// Creates a polynomial borrowing its coefficients.
    ///
    /// An empty slice is the zero polynomial.
    #[must_use]
    pub const fn borrowed(coefficients: &'a [f64]) -> Self {
        Self {
            coefficients: Cow::Borrowed(coefficients),
        }
    }

    /// Creates a polynomial owning its coefficients.
    #[must_use]
    pub fn owned(coefficients: Vec<f64>) -> Polynomial<'static> {
        Polynomial {
            coefficients: Cow::Owned(coefficients),
        }
    }

    /// Coefficients, lowest degree first.
    ///
    /// For `y(x) = 2x^2 - 3x + 1`, coefficients = `[1.0, -3.0, 2.0]`
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree of the polynomial: number of coefficients minus one.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `x` with Horner's method.
    #[must_use]
    pub fn y(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluates the polynomial at every `x`.
    ///
    /// # Example
    /// ```
    /// # use plotfit::Polynomial;
    /// let poly = Polynomial::borrowed(&[1.0, 2.0, 3.0]);
    /// assert_eq!(poly.solve([0.0, 1.0]), vec![(0.0, 1.0), (1.0, 6.0)]);
    /// ```
    pub fn solve(&self, x: impl IntoIterator<Item = f64>) -> Vec<(f64, f64)> {
        x.into_iter().map(|x| (x, self.y(x))).collect()
    }

    /// Evaluates the polynomial at `count` evenly spaced points covering `range`.
    ///
    /// The last sample is exactly `range.end()`.
    #[must_use]
    pub fn solve_linspace(&self, range: RangeInclusive<f64>, count: usize) -> Vec<(f64, f64)> {
        self.solve(linspace(*range.start(), *range.end(), count))
    }

    /// R² and RMSE of the polynomial against `data`.
    ///
    /// See [`statistics::FitMetrics`].
    #[must_use]
    pub fn metrics(&self, data: &[(f64, f64)]) -> FitMetrics {
        let y = data.y_iter();
        let y_fit = data.x_iter().map(|x| self.y(x));
        FitMetrics::new(y, y_fit)
    }

    /// R² of the polynomial against `data`, `None` if degenerate.
    ///
    /// See [`statistics::r_squared`].
    #[must_use]
    pub fn r_squared(&self, data: &[(f64, f64)]) -> Option<f64> {
        statistics::r_squared(data.y_iter(), data.x_iter().map(|x| self.y(x)))
    }

    /// Human-readable equation, e.g. `y = 1.0000 - 2.5000·x^2`.
    ///
    /// See [`display::format_polynomial`].
    #[must_use]
    pub fn equation(&self) -> String {
        display::format_polynomial(&self.coefficients)
    }
}

impl std::fmt::Display for Polynomial<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.equation())
    }
}

impl From<Vec<f64>> for Polynomial<'static> {
    fn from(coefficients: Vec<f64>) -> Self {
        Polynomial::owned(coefficients)
    }
}

//! Trapezoidal area under a series.

/// Integrates `values` over `labels` with the trapezoidal rule.
///
/// Segments with a gap, a non-finite label or value, or a label step below `f64::EPSILON`
/// are left out of the sum. Returns `None` if the lengths differ, there are fewer than two
/// labels, or no segment could be used.
///
/// ```
/// # use plotfit::integrate::area_under_curve;
/// let area = area_under_curve(&[0.0, 1.0, 2.0], &[Some(0.0), Some(2.0), Some(0.0)]);
/// assert_eq!(area, Some(2.0));
/// ```
#[must_use]
pub fn area_under_curve(labels: &[f64], values: &[Option<f64>]) -> Option<f64> {
    if labels.len() != values.len() || labels.len() < 2 {
        return None;
    }

    let mut area = None;
    for (x, y) in labels.windows(2).zip(values.windows(2)) {
        let (x0, x1) = (x[0], x[1]);
        let (Some(y0), Some(y1)) = (y[0], y[1]) else {
            continue;
        };

        if !x0.is_finite() || !x1.is_finite() || !y0.is_finite() || !y1.is_finite() {
            continue;
        }

        let dx = x1 - x0;
        if !dx.is_finite() || dx.abs() < f64::EPSILON {
            continue;
        }

        *area.get_or_insert(0.0) += (y0 + y1) / 2.0 * dx;
    }

    area
}

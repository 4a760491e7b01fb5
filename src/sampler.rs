//! Evenly spaced sampling of a plotting domain.
//!
//! The sampler turns `(min, max, step)` into a bounded list of labels. The step is
//! normalised first, then widened if the domain would produce more than
//! [`DomainSampler::max_points`] samples.
//!
//! ```rust
//! use plotfit::sampler::sample;
//!
//! let sampling = sample(0.0, 1.0, 0.25);
//! assert_eq!(sampling.labels, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
//! assert!(sampling.warnings.is_empty());
//! ```
use crate::value::round_label;

/// Hard cap on the number of samples in one domain.
pub const MAX_POINTS: usize = 5000;

/// Step used when the requested one is zero or not finite.
pub const DEFAULT_STEP: f64 = 0.1;

/// Warning emitted when either bound is NaN or infinite.
pub const INVALID_BOUNDS_WARNING: &str = "Minimum or maximum X is not a valid number.";

/// Warning emitted when `max <= min`.
pub const EMPTY_RANGE_WARNING: &str = "Max X must be greater than Min X.";

/// Warning emitted when the step had to be widened.
pub const STEP_ADJUSTED_WARNING: &str =
    "Sampling step was automatically adjusted to avoid performance issues.";

/// Result of sampling a domain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sampling {
    /// Strictly increasing labels, rounded to 6 decimals
    pub labels: Vec<f64>,

    /// Step actually used between labels
    pub effective_step: f64,

    /// Non-fatal problems with the requested domain
    pub warnings: Vec<String>,
}

/// Normalises a user-supplied step: `0` and non-finite become [`DEFAULT_STEP`], negatives flip sign.
#[must_use]
pub fn normalize_step(step: f64) -> f64 {
    if !step.is_finite() || step == 0.0 {
        DEFAULT_STEP
    } else {
        step.abs()
    }
}

/// Samples domains with a configurable point cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainSampler {
    max_points: usize,
}
impl Default for DomainSampler {
    fn default() -> Self {
        Self {
            max_points: MAX_POINTS,
        }
    }
}
impl DomainSampler {
    /// Creates a sampler producing at most `max_points` labels (at least 2).
    #[must_use]
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points: max_points.max(2),
        }
    }

    /// Maximum number of labels produced.
    #[must_use]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Samples `[min, max]` with the given step.
    ///
    /// Invalid bounds produce no labels and a warning; the effective step is then the
    /// normalised request. Labels are computed as `min + i * step` rather than by
    /// accumulation, and a label that rounds onto its predecessor is skipped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn sample(&self, min: f64, max: f64, step: f64) -> Sampling {
        let mut effective_step = normalize_step(step);

        if !min.is_finite() || !max.is_finite() {
            return Sampling {
                effective_step,
                warnings: vec![INVALID_BOUNDS_WARNING.to_string()],
                ..Sampling::default()
            };
        }

        if max <= min {
            return Sampling {
                effective_step,
                warnings: vec![EMPTY_RANGE_WARNING.to_string()],
                ..Sampling::default()
            };
        }

        let mut warnings = Vec::new();
        let range = max - min;
        let mut estimated = (range / effective_step).floor() + 1.0;

        if !estimated.is_finite() || estimated > self.max_points as f64 {
            let intervals = (self.max_points - 1) as f64;
            effective_step = if range.is_finite() {
                range / intervals
            } else {
                max / intervals - min / intervals
            };
            estimated = self.max_points as f64;
            warnings.push(STEP_ADJUSTED_WARNING.to_string());
            tracing::debug!(min, max, step, effective_step, "sampling step widened");
        }

        let estimated = estimated as usize;
        let limit = max + effective_step / 2.0;
        let mut labels: Vec<f64> = Vec::with_capacity(estimated);

        for i in 0..estimated {
            let x = if range.is_finite() {
                min + effective_step * i as f64
            } else {
                // The span itself overflows, so step between the bounds instead
                let t = i as f64 / (estimated - 1) as f64;
                min * (1.0 - t) + max * t
            };
            if x > limit {
                break;
            }

            let label = round_label(x);
            if labels.last() != Some(&label) {
                labels.push(label);
            }
        }

        Sampling {
            labels,
            effective_step,
            warnings,
        }
    }
}

/// Samples `[min, max]` with the default [`MAX_POINTS`] cap.
#[must_use]
pub fn sample(min: f64, max: f64, step: f64) -> Sampling {
    DomainSampler::default().sample(min, max, step)
}

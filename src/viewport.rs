//! Pan and zoom over a chart, clamped to the chart's data bounds.
//!
//! A [`Viewport`] holds the full data [`Bounds`] and the currently visible window. Every
//! operation either produces a window inside the bounds at least [`MIN_SPAN`] wide on
//! both axes, or leaves the window unchanged and returns `false`.
//!
//! ```rust
//! use plotfit::viewport::{Bounds, PanDirection, Viewport};
//!
//! let mut viewport = Viewport::new(Bounds::new(0.0..=10.0, 0.0..=10.0));
//! assert!(viewport.zoom_in_by(0.5, Some(5.0)));
//! assert_eq!(viewport.current().x_range(), 2.5..=7.5);
//!
//! for _ in 0..10 {
//!     viewport.pan(PanDirection::Right);
//! }
//! assert_eq!(viewport.current().x_range(), 5.0..=10.0);
//! ```
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Narrowest window accepted on either axis.
pub const MIN_SPAN: f64 = 1e-6;

/// Half-width added around a bound that collapses to a single value.
pub const DEGENERATE_PADDING: f64 = 0.5;

/// Fraction of the visible span moved by one [`Viewport::pan`].
pub const PAN_FRACTION: f64 = 0.25;

/// Default factor of [`Viewport::zoom_in`].
pub const ZOOM_IN_FACTOR: f64 = 0.85;

/// Default factor of [`Viewport::zoom_out`].
pub const ZOOM_OUT_FACTOR: f64 = 1.15;

/// A rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Left edge
    pub x_min: f64,

    /// Right edge
    pub x_max: f64,

    /// Bottom edge
    pub y_min: f64,

    /// Top edge
    pub y_max: f64,
}
impl Bounds {
    /// Bounds covering `x` by `y`.
    ///
    /// An axis narrower than [`MIN_SPAN`] is widened by [`DEGENERATE_PADDING`] on each side,
    /// so a constant series still gets a drawable window.
    #[must_use]
    pub fn new(x: RangeInclusive<f64>, y: RangeInclusive<f64>) -> Self {
        let (x_min, x_max) = pad(x);
        let (y_min, y_max) = pad(y);
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// `x_min..=x_max`
    #[must_use]
    pub fn x_range(&self) -> RangeInclusive<f64> {
        self.x_min..=self.x_max
    }

    /// `y_min..=y_max`
    #[must_use]
    pub fn y_range(&self) -> RangeInclusive<f64> {
        self.y_min..=self.y_max
    }

    /// Horizontal extent
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    fn axis(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.x_min, self.x_max),
            Axis::Y => (self.y_min, self.y_max),
        }
    }

    fn with_axis(mut self, axis: Axis, (min, max): (f64, f64)) -> Self {
        match axis {
            Axis::X => (self.x_min, self.x_max) = (min, max),
            Axis::Y => (self.y_min, self.y_max) = (min, max),
        }
        self
    }

    /// Clamps `candidate` into `self`, or `None` if it collapses below [`MIN_SPAN`].
    fn clamp(&self, candidate: Self) -> Option<Self> {
        let x_min = candidate.x_min.clamp(self.x_min, self.x_max);
        let x_max = candidate.x_max.clamp(self.x_min, self.x_max);
        let y_min = candidate.y_min.clamp(self.y_min, self.y_max);
        let y_max = candidate.y_max.clamp(self.y_min, self.y_max);

        let clamped = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        (clamped.width() >= MIN_SPAN && clamped.height() >= MIN_SPAN).then_some(clamped)
    }
}

fn pad(range: RangeInclusive<f64>) -> (f64, f64) {
    let (min, max) = range.into_inner();
    if max - min < MIN_SPAN {
        (min - DEGENERATE_PADDING, max + DEGENERATE_PADDING)
    } else {
        (min, max)
    }
}

/// Chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal
    X,

    /// Vertical
    Y,
}

/// Direction of a fixed-size pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    /// Towards smaller x
    Left,

    /// Towards larger x
    Right,

    /// Towards larger y
    Up,

    /// Towards smaller y
    Down,
}
impl PanDirection {
    fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::X,
            Self::Up | Self::Down => Axis::Y,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::Left | Self::Down => -1.0,
            Self::Right | Self::Up => 1.0,
        }
    }
}

/// Visible window over a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    bounds: Bounds,
    current: Bounds,
}
impl Viewport {
    /// A viewport showing all of `bounds`.
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            current: bounds,
        }
    }

    /// Full data bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Visible window.
    #[must_use]
    pub fn current(&self) -> Bounds {
        self.current
    }

    /// Follows new data bounds. The window is reset only if the bounds changed value.
    ///
    /// Returns true if the window was reset.
    pub fn sync(&mut self, bounds: Bounds) -> bool {
        if bounds == self.bounds {
            return false;
        }

        *self = Self::new(bounds);
        true
    }

    /// Shows the full data bounds again.
    pub fn reset(&mut self) {
        self.current = self.bounds;
    }

    fn apply(&mut self, candidate: Bounds) -> bool {
        match self.bounds.clamp(candidate) {
            Some(next) => {
                self.current = next;
                true
            }
            None => {
                tracing::trace!(?candidate, "viewport change rejected");
                false
            }
        }
    }

    /// Scales one axis of the window by `factor` around `anchor`.
    ///
    /// Each side of the anchor is scaled independently, so the anchor stays put. An anchor
    /// that is missing or outside the data bounds is replaced by the window midpoint.
    /// Factors that are not positive and finite are rejected.
    pub fn zoom_axis(&mut self, axis: Axis, factor: f64, anchor: Option<f64>) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }

        let (min, max) = self.current.axis(axis);
        let range = max - min;
        if range <= 0.0 {
            return false;
        }

        let (outer_min, outer_max) = self.bounds.axis(axis);
        let anchor = anchor
            .filter(|a| (outer_min..=outer_max).contains(a))
            .unwrap_or(min + range / 2.0);

        let lower = (anchor - min) * factor;
        let upper = (max - anchor) * factor;
        self.apply(self.current.with_axis(axis, (anchor - lower, anchor + upper)))
    }

    /// Zooms the x axis in by [`ZOOM_IN_FACTOR`].
    pub fn zoom_in(&mut self, anchor: Option<f64>) -> bool {
        self.zoom_in_by(ZOOM_IN_FACTOR, anchor)
    }

    /// Zooms the x axis in, with `factor` clamped to `[0.01, 0.99]`.
    pub fn zoom_in_by(&mut self, factor: f64, anchor: Option<f64>) -> bool {
        self.zoom_axis(Axis::X, factor.clamp(0.01, 0.99), anchor)
    }

    /// Zooms the x axis out by [`ZOOM_OUT_FACTOR`].
    pub fn zoom_out(&mut self, anchor: Option<f64>) -> bool {
        self.zoom_out_by(ZOOM_OUT_FACTOR, anchor)
    }

    /// Zooms the x axis out, with `factor` raised to at least `1.01`.
    pub fn zoom_out_by(&mut self, factor: f64, anchor: Option<f64>) -> bool {
        self.zoom_axis(Axis::X, factor.max(1.01), anchor)
    }

    /// Zooms the y axis in, with `factor` clamped to `[0.01, 0.99]`.
    pub fn zoom_y_in_by(&mut self, factor: f64, anchor: Option<f64>) -> bool {
        self.zoom_axis(Axis::Y, factor.clamp(0.01, 0.99), anchor)
    }

    /// Zooms the y axis out, with `factor` raised to at least `1.01`.
    pub fn zoom_y_out_by(&mut self, factor: f64, anchor: Option<f64>) -> bool {
        self.zoom_axis(Axis::Y, factor.max(1.01), anchor)
    }

    /// Moves the window by a quarter of its span.
    pub fn pan(&mut self, direction: PanDirection) -> bool {
        let axis = direction.axis();
        let (min, max) = self.current.axis(axis);
        self.shift(axis, (max - min) * PAN_FRACTION * direction.sign())
    }

    /// Moves the window horizontally by `delta` data units.
    pub fn pan_by_offset(&mut self, delta: f64) -> bool {
        self.shift(Axis::X, delta)
    }

    /// Moves the window vertically by `delta` data units.
    pub fn pan_y_by_offset(&mut self, delta: f64) -> bool {
        self.shift(Axis::Y, delta)
    }

    /// Shifts an axis, sliding back so neither edge leaves the data bounds.
    fn shift(&mut self, axis: Axis, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }

        let (min, max) = self.current.axis(axis);
        let (outer_min, outer_max) = self.bounds.axis(axis);

        let (mut min, mut max) = (min + delta, max + delta);
        if max > outer_max {
            min -= max - outer_max;
            max = outer_max;
        }
        if min < outer_min {
            max += outer_min - min;
            min = outer_min;
        }

        self.apply(self.current.with_axis(axis, (min, max)))
    }
}

//! # Plotfit
//! ## Type a function, drop in some data, get a chart back
//!
//! This crate is the numeric core of a function and dataset plotter. It does not draw windows or
//! handle clicks; it turns what a user typed or imported into chart data a renderer can draw,
//! plus the warnings and statistics that go alongside it.
//!
//! What you get:
//! - Safe evaluation of user expressions like `e^(-x^2)` or `sin(x)/x` - no code generation, just a small parser
//! - Bounded sampling of a domain, so a silly step can't produce millions of points
//! - Least-squares polynomial fits (degree 1 to 5), or let it pick the best one for you
//! - Merging of function and dataset series onto one x axis
//! - Intersection detection between every pair of visible series
//! - Pan and zoom arithmetic that never leaves the data
//! - CSV and spreadsheet import, CSV export, and SVG rendering (`plotting` feature)
//!
//! The simplest use-case is plotting a function and a dataset together:
//! ```rust
//! use plotfit::{
//!     config::PlotRequest,
//!     expression::Evaluator,
//!     fit::{FitConfig, FitType},
//!     series::{DataSeries, FunctionSeries},
//! };
//!
//! let mut request = PlotRequest::default();
//! request.functions.push(FunctionSeries::new("f1", "f1", "x^2", "#2563eb"));
//! request.datasets.push(
//!     DataSeries::new("s1", "Samples", "#22c55e", [(0.0, 1.0), (1.0, 3.1), (2.0, 4.9), (3.0, 7.0)])
//!         .with_fit(FitConfig::new(FitType::Auto)),
//! );
//!
//! let evaluator = Evaluator::new();
//! let plot = plotfit::plot::plot(&request, &evaluator);
//!
//! assert!(plot.warnings.is_empty());
//! let fit = plot.dataset_stats.series[0].fit.as_ref().unwrap();
//! assert!(fit.r_squared.unwrap() > 0.99);
//!
//! // Every place two visible curves cross
//! let crossings = plotfit::intersection::detect_intersections(&plot.chart);
//! assert!(!crossings.is_empty());
//! ```
//!
//! # Core Concepts
//! - A **series** is one named, coloured source of values that can be toggled on and off.
//!     - [`series::FunctionSeries`] is an expression of `x`, sampled over a [`config::DomainSettings`]
//!     - [`series::DataSeries`] is a list of measured points, optionally with a fit
//! - A **label** is an x coordinate shared by every dataset of a [`chart::ChartData`].
//!     - Each dataset holds exactly one value per label; `None` is a gap
//! - A **fit** is a least-squares [`Polynomial`] approximating a data series.
//!     - It is only drawn inside the x range of the points it was fitted to
//!     - [`fit::FitType::Auto`] tries every degree and keeps the best R², then RMSE, then the lowest degree
//! - The **viewport** is the visible window over the chart's full bounds. See [`viewport::Viewport`].
//!
//! # Errors and warnings
//!
//! Problems with a single series never stop the rest from plotting. They are collected as
//! human-readable warning strings on [`plot::PlotResult`]. Numeric dead-ends (division by zero,
//! `log` of a negative) are just gaps in the data. Only whole-operation failures, like an
//! unreadable file, are returned as [`Error`].
//!
//! # Testing utilities
//!
//! The [`test`] module holds the assertion macros the test-suite uses to compare floats.
//!
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod test;

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod render;

pub mod chart;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod export;
pub mod expression;
pub mod fit;
pub mod import;
pub mod integrate;
pub mod intersection;
pub mod merge;
pub mod palette;
pub mod plot;
pub mod sampler;
pub mod series;
pub mod statistics;
pub mod value;
pub mod viewport;

mod polynomial;

pub use error::{Error, Result};
pub use fit::{fit_series, CurveFit, FitConfig, FitType};
pub use polynomial::Polynomial;

pub use nalgebra;

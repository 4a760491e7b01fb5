//! Error types for the plotting pipeline
//!
//! Most problems the pipeline runs into are not errors at all: bad domains and
//! unplottable series become warning strings, and numeric dead-ends become
//! `None` values in the chart data. The variants here cover the whole-operation
//! failures a caller is expected to catch and translate into feedback.
use crate::expression::ExpressionError;

/// Errors that can occur while fitting, importing or exporting plot data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A polynomial degree below 1 was requested.
    #[error("Polynomial degree must be at least 1.")]
    InvalidDegree(usize),

    /// The regression was given fewer points than the degree requires.
    #[error("At least {required} data points are required for a degree {degree} fit.")]
    NotEnoughPoints {
        /// Number of points needed (`degree + 1`)
        required: usize,
        /// Requested polynomial degree
        degree: usize,
    },

    /// The normal-equation system has no usable pivot.
    ///
    /// Usually the x values are (nearly) identical or too few to pin down the degree.
    #[error("Unable to compute a stable polynomial fit for the provided points.")]
    SingularSystem,

    /// A series does not hold enough unique points for the requested fit.
    #[error("Series \"{series}\" needs at least {required} unique points for a {fit}.")]
    InsufficientPoints {
        /// Label of the series being fitted
        series: String,
        /// Number of unique points needed
        required: usize,
        /// Lower-cased fit label, e.g. `quadratic fit`
        fit: String,
    },

    /// All x values of a series collapse onto (nearly) one value.
    #[error("Series \"{series}\" requires at least two distinct x values to compute a fit.")]
    DegenerateDomain {
        /// Label of the series being fitted
        series: String,
    },

    /// The regression itself failed for a series.
    #[error("Could not compute {fit} for \"{series}\": {source}")]
    FitFailed {
        /// Label of the series being fitted
        series: String,
        /// Lower-cased fit label
        fit: String,
        /// Underlying regression failure
        #[source]
        source: Box<Error>,
    },

    /// Auto mode had nothing to choose from.
    #[error("Unable to compute an auto fit for \"{series}\".")]
    NoFitCandidates {
        /// Label of the series being fitted
        series: String,
    },

    /// The import collaborator was handed a file it cannot read.
    #[error("Unsupported file type. Please upload CSV or Excel files.")]
    UnsupportedFileType(String),

    /// The workbook could not be opened or its first sheet read.
    #[error("Unable to read the workbook: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The workbook has no worksheet to import from.
    #[error("The workbook does not contain any sheets.")]
    EmptyWorkbook,

    /// An expression could not be compiled.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// I/O failure while reading or writing plot data.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed delimited text.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Malformed JSON plot request.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for the plotting pipeline
pub type Result<T> = std::result::Result<T, Error>;

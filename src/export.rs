//! CSV export of chart data.
//!
//! The header row is `x` followed by each dataset's label. Each row after it holds one
//! label and every dataset's value there, formatted with [`format_number`]. Gaps are
//! empty cells.
//!
//! ```rust
//! use plotfit::{chart::{ChartData, ChartDataset, DatasetStyle}, export::to_csv_string};
//!
//! let chart = ChartData::new(
//!     vec![0.0, 0.5],
//!     vec![ChartDataset::new("f(x) = x^2", vec![Some(0.0), Some(0.25)], DatasetStyle::default())],
//! );
//! assert_eq!(to_csv_string(&chart).unwrap(), "x,f(x) = x^2\n0,0\n0.5,0.25\n");
//! ```
use std::io::Write;

use crate::{chart::ChartData, error::Result, value::format_number};

/// Writes `chart` as CSV.
///
/// Nothing is written for a chart without labels. Cells containing the delimiter or a
/// quote are quoted.
///
/// # Errors
/// Returns [`crate::Error::Csv`] or [`crate::Error::Io`] if writing fails.
pub fn write_csv<W: Write>(chart: &ChartData, writer: W) -> Result<()> {
    if chart.labels.is_empty() {
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let header = std::iter::once("x").chain(chart.datasets.iter().map(|d| d.label.as_str()));
    writer.write_record(header)?;

    for (row, label) in chart.labels.iter().enumerate() {
        let values = chart.datasets.iter().map(|dataset| {
            dataset
                .data
                .get(row)
                .copied()
                .flatten()
                .map(format_number)
                .unwrap_or_default()
        });
        writer.write_record(std::iter::once(format_number(*label)).chain(values))?;
    }

    writer.flush()?;
    Ok(())
}

/// Renders `chart` as a CSV string. See [`write_csv`].
///
/// # Errors
/// Returns [`crate::Error::Csv`] if the writer fails.
pub fn to_csv_string(chart: &ChartData) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(chart, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartDataset, DatasetStyle};

    #[test]
    fn test_gaps_and_formatting() {
        let chart = ChartData::new(
            vec![-1.0, 1e-7, 2.0],
            vec![
                ChartDataset::new("a", vec![Some(1.5), None, Some(3e21)], DatasetStyle::default()),
                ChartDataset::new("b", vec![None, Some(-2.0)], DatasetStyle::default()),
            ],
        );

        let csv = to_csv_string(&chart).unwrap();
        assert_eq!(csv, "x,a,b\n-1,1.5,\n1e-7,,-2\n2,3e+21,\n");
    }

    #[test]
    fn test_labels_are_quoted_when_needed() {
        let chart = ChartData::new(
            vec![1.0],
            vec![ChartDataset::new("g(x) = pow(x, 2)", vec![Some(1.0)], DatasetStyle::default())],
        );

        let csv = to_csv_string(&chart).unwrap();
        assert_eq!(csv, "x,\"g(x) = pow(x, 2)\"\n1,1\n");
    }

    #[test]
    fn test_empty_chart() {
        assert_eq!(to_csv_string(&ChartData::default()).unwrap(), "");
    }
}

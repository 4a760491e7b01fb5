//! Importing data points from delimited text files and spreadsheets.
//!
//! The delimiter is picked from the first non-empty line: `;` if present, then tab,
//! otherwise `,`. Quotes are stripped rather than interpreted, and there is no header
//! detection; a header simply fails to parse as numbers and is dropped like any other
//! bad row.
//!
//! ```rust
//! use plotfit::import::parse_delimited;
//!
//! let points = parse_delimited("x,y\n1,2\n3,4\n").unwrap();
//! let coords: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
//! assert_eq!(coords, vec![(1.0, 2.0), (3.0, 4.0)]);
//! ```
use std::path::Path;

use calamine::Reader;

use crate::{
    error::{Error, Result},
    series::DataPoint,
};

/// File extensions accepted by [`import_path`].
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["csv", "tsv", "txt", "xlsx", "xls"];

/// Picks the delimiter for a line of text.
#[must_use]
pub fn detect_delimiter(line: &str) -> u8 {
    if line.contains(';') {
        b';'
    } else if line.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

/// Parses delimited text into points.
///
/// Every row is cleaned first: quotes removed, cells trimmed, empty cells dropped. Rows
/// with fewer than two cells left are skipped, as are rows whose first two cells do not
/// both start with a finite number. Only that leading number is read, so `12 cm` is 12.
/// Extra cells are ignored.
///
/// Points get sequential ids, `point-1` onward.
///
/// # Errors
/// Returns [`Error::Csv`] if the reader fails.
pub fn parse_delimited(text: &str) -> Result<Vec<DataPoint>> {
    let Some(first) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return Ok(Vec::new());
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(first))
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    Ok(points_from_rows(rows))
}

/// Reads points from the first worksheet of a workbook (`xlsx`, `xls`, `xlsb` or `ods`).
///
/// Cells are turned into text and cleaned the same way as [`parse_delimited`], so the
/// first two non-empty cells of each row become `x` and `y`.
///
/// # Errors
/// - [`Error::Spreadsheet`] if the workbook cannot be opened or the sheet read
/// - [`Error::EmptyWorkbook`] if there is no sheet at all
pub fn parse_workbook(path: impl AsRef<Path>) -> Result<Vec<DataPoint>> {
    let mut workbook = calamine::open_workbook_auto(path.as_ref())?;
    let sheet = workbook.worksheet_range_at(0).ok_or(Error::EmptyWorkbook)??;

    let rows = sheet
        .rows()
        .map(|row| row.iter().map(ToString::to_string).collect::<Vec<_>>());
    Ok(points_from_rows(rows))
}

fn points_from_rows(rows: impl IntoIterator<Item = Vec<String>>) -> Vec<DataPoint> {
    let mut points = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.replace('"', "").trim().to_string())
            .filter(|cell| !cell.is_empty())
            .collect();

        let [x, y, ..] = cells.as_slice() else {
            continue;
        };

        match (parse_number(x), parse_number(y)) {
            (Some(x), Some(y)) => {
                let mut point = DataPoint::new(x, y);
                point.id = format!("point-{}", points.len() + 1);
                points.push(point);
            }
            _ => skipped += 1,
        }
    }

    tracing::debug!(points = points.len(), skipped, "rows imported");
    points
}

/// Reads the number a cell starts with: `12abc` is 12, `-.5e1x` is -5, `abc` is nothing.
fn parse_number(cell: &str) -> Option<f64> {
    let bytes = cell.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let whole = digits(end);
    end += whole;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits(end + 1);
        end += 1 + fraction;
    }

    if whole + fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }

        let count = digits(exponent);
        if count > 0 {
            end = exponent + count;
        }
    }

    cell[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads points from a file, dispatching on its extension.
///
/// - `csv`, `tsv`, `txt`: parsed with [`parse_delimited`]
/// - `xlsx`, `xls`: first sheet, read with [`parse_workbook`]
///
/// # Errors
/// - [`Error::UnsupportedFileType`] for any other extension, or none
/// - [`Error::Io`] if a text file cannot be read
/// - anything [`parse_workbook`] returns, for spreadsheets
pub fn import_path(path: impl AsRef<Path>) -> Result<Vec<DataPoint>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "tsv" | "txt" => {
            let text = std::fs::read_to_string(path)?;
            parse_delimited(&text)
        }
        "xlsx" | "xls" => parse_workbook(path),
        _ => Err(Error::UnsupportedFileType(extension)),
    }
}

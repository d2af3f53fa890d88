//! CSV preview parsing.
//!
//! Splits on newlines and commas only. Quoted fields are not understood, so
//! `"Paris, FR"` becomes two cells. Rows are not checked against the header
//! width.

use serde::Serialize;

use crate::error::ParseError;

/// Maximum number of data rows kept for preview.
pub const PREVIEW_ROW_LIMIT: usize = 5;

/// Header plus the first few data rows of a CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows whose cell count differs from the header.
    pub fn ragged_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        let width = self.headers.len();
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.len() != width)
    }
}

/// Parse raw file text into a preview table.
///
/// # Errors
/// `EmptyFile` when the text has fewer than two lines, `NoDataRows` when
/// lines 2 through 6 are all blank.
pub fn parse_preview(text: &str) -> Result<CsvTable, ParseError> {
    let lines: Vec<&str> = text.split('\n').collect();

    if lines.len() < 2 {
        return Err(ParseError::EmptyFile);
    }

    let headers = split_cells(lines[0]);

    let rows: Vec<Vec<String>> = lines
        .iter()
        .skip(1)
        .take(PREVIEW_ROW_LIMIT)
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_cells(line))
        .collect();

    if rows.is_empty() {
        return Err(ParseError::NoDataRows);
    }

    tracing::debug!(
        "Parsed CSV preview: {} columns, {} rows",
        headers.len(),
        rows.len()
    );

    Ok(CsvTable { headers, rows })
}

fn split_cells(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

//! Raw tabular input.
//!
//! This module contains the [`Cell`] and [`RawTable`] types that the input
//! loaders produce and the processing stage consumes. Nothing about the
//! content is trusted: cells may hold text, numbers, dates or nothing at all.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell.
///
/// Serialized untagged so that a JSON `null`, number or string maps onto the
/// matching variant. Strings in ISO `YYYY-MM-DD` form deserialize as dates.
///
/// # Example
///
/// ```
/// use payroll_sheets::models::Cell;
///
/// let cell: Cell = serde_json::from_str("\"1.234,56\"").unwrap();
/// assert_eq!(cell, Cell::Text("1.234,56".to_string()));
///
/// let empty: Cell = serde_json::from_str("null").unwrap();
/// assert!(empty.is_blank());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A missing value.
    #[default]
    Empty,
    /// A numeric value as typed by the spreadsheet.
    Number(#[serde(with = "rust_decimal::serde::float")] Decimal),
    /// A calendar date as typed by the spreadsheet.
    Date(NaiveDate),
    /// Free text.
    Text(String),
}

impl Cell {
    /// Returns true if the cell is empty or holds only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) | Cell::Date(_) => false,
        }
    }

    /// Returns the textual rendering of the cell.
    ///
    /// Numbers are rendered without trailing zeros so that a code typed as
    /// `1234.0` reads the same as `1234`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(value) => value.normalize().to_string(),
            Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
            Cell::Text(text) => text.clone(),
        }
    }

    /// Returns the trimmed textual rendering of the cell.
    pub fn trimmed_text(&self) -> String {
        self.as_text().trim().to_string()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&Cell> for Cell {
    fn from(cell: &Cell) -> Self {
        cell.clone()
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(Decimal::from(value))
    }
}

impl From<NaiveDate> for Cell {
    fn from(date: NaiveDate) -> Self {
        Cell::Date(date)
    }
}

/// A 2-D cell grid with one header label per column.
///
/// Rows may be shorter or longer than the header row; lookups beyond the end
/// of a row yield `None` rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column header labels, in column order.
    pub headers: Vec<String>,
    /// Data rows, in source order.
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Creates a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Returns a copy of the table with cleaned header labels.
    ///
    /// Labels are trimmed and line breaks inside them become single spaces,
    /// so `"Descrizione\noperatore"` reads `"Descrizione operatore"`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_sheets::models::RawTable;
    ///
    /// let table = RawTable::new(vec!["  Consegna \n".to_string(), "Ragione\nsociale".to_string()], vec![]);
    /// let cleaned = table.with_clean_headers();
    /// assert_eq!(cleaned.headers, vec!["Consegna", "Ragione sociale"]);
    /// ```
    pub fn with_clean_headers(&self) -> Self {
        let headers = self
            .headers
            .iter()
            .map(|header| {
                header
                    .trim()
                    .replace("\r\n", " ")
                    .replace(['\n', '\r'], " ")
            })
            .collect();
        Self {
            headers,
            rows: self.rows.clone(),
        }
    }

    /// Returns the number of columns defined by the header row.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Returns the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell at the given position, if the row is long enough.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Returns the index of the column whose label equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Returns the index of the first column whose label contains any of the
    /// given keywords, compared case-insensitively.
    pub fn find_column_containing<S: AsRef<str>>(&self, keywords: &[S]) -> Option<usize> {
        self.headers.iter().position(|header| {
            let header = header.to_lowercase();
            keywords
                .iter()
                .any(|keyword| header.contains(&keyword.as_ref().to_lowercase()))
        })
    }
}

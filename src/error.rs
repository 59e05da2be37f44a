//! Error types for the payroll sheet engine.
//!
//! Only structural problems are errors. Row-level defects are recovered
//! locally and reported as [`RowIssue`](crate::models::RowIssue) values.

use thiserror::Error;

/// The main error type for the payroll sheet engine.
///
/// # Example
///
/// ```
/// use payroll_sheets::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/layout.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/layout.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds inconsistent values.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// The input table has no columns at all.
    #[error("Input table is empty: no columns found")]
    EmptyTable,

    /// The table has data rows but no column can serve as the operator key.
    #[error("No operator column could be resolved for {rows} data rows")]
    NoOperatorColumn {
        /// Number of data rows in the table.
        rows: usize,
    },

    /// A period was requested for a month or year that does not exist.
    #[error("Invalid period: year {year}, month {month}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month (1-based).
        month: u32,
    },

    /// Delimited input could not be read.
    #[error("Failed to read input at line {line}: {message}")]
    InputParseError {
        /// 1-based line number in the source, 0 if it could not be opened.
        line: u64,
        /// A description of the read error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

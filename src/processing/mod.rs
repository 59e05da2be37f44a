//! Processing logic for payroll exports.
//!
//! This module contains numeric coercion and currency rendering, period
//! inference, column extraction with positional and header-name
//! strategies, delivery date resolution with the day-of-month cutoff rule,
//! the end-to-end pipeline, and per-operator report grouping.

mod delivery_date;
mod normalizer;
mod number_format;
mod period_inference;
mod pipeline;
mod reports;

pub use delivery_date::{
    DateResolution, delivery_month, extract_day, resolve_dates, resolve_delivery_date,
};
pub use normalizer::{DEFAULT_STRATEGIES, Extraction, extract_records};
pub use number_format::{
    format_amount, format_currency, parse_number_text, to_currency_string, to_number,
};
pub use period_inference::{date_columns, infer_period, parse_date_text};
pub use pipeline::{apply_employee_totals, normalize, normalize_and_resolve};
pub use reports::{group_by_operator, report_file_name};

//! Delivery date resolution.
//!
//! Every company row carries a raw delivery cell holding a day of month, in
//! whatever shape the spreadsheet produced. The day is mapped onto the
//! selected period with a cutoff rule: days after the cutoff fall in the
//! selected month, earlier days fall in the following month.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info, warn};

use crate::config::DeliveryRules;
use crate::models::{
    Cell, CompanyDateEntry, PeriodInfo, ProcessingStage, RawTable, RowIssue, SkipReason,
    last_day_of_month,
};

use super::period_inference::parse_date_text;

/// Delivery dates keyed by trimmed company code, plus the rows left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateResolution {
    /// Resolved entry per company code. Later rows overwrite earlier ones.
    pub entries: HashMap<String, CompanyDateEntry>,
    /// Rows that produced no entry.
    pub issues: Vec<RowIssue>,
}

impl DateResolution {
    /// Returns the formatted delivery date for a company code, if resolved.
    pub fn formatted_for(&self, company_code: &str) -> Option<&str> {
        self.entries
            .get(company_code.trim())
            .map(|entry| entry.formatted.as_str())
    }

    fn skip(&mut self, row: usize, reason: SkipReason) {
        warn!(row, reason = %reason, "Skipping row during date resolution");
        self.issues.push(RowIssue {
            row,
            stage: ProcessingStage::DateResolution,
            reason,
        });
    }
}

/// Builds the company code to delivery date mapping for a table.
///
/// A table without the delivery column yields an empty mapping, so every
/// company falls back to the sentinel date downstream. Rows with a blank
/// code, or in a table without the code column, are recorded as issues.
pub fn resolve_dates(
    table: &RawTable,
    period: &PeriodInfo,
    rules: &DeliveryRules,
) -> DateResolution {
    let mut resolution = DateResolution::default();

    let Some(delivery_column) = table.column_index(&rules.delivery_column) else {
        info!(
            column = %rules.delivery_column,
            "Delivery column not found, all companies get the sentinel date"
        );
        return resolution;
    };
    let code_column = table.column_index(&rules.code_column);

    for row in 0..table.row_count() {
        let Some(code_column) = code_column else {
            resolution.skip(
                row,
                SkipReason::MissingCodeColumn {
                    column: rules.code_column.clone(),
                },
            );
            continue;
        };

        let code = table
            .cell(row, code_column)
            .map(Cell::trimmed_text)
            .unwrap_or_default();
        if code.is_empty() {
            resolution.skip(row, SkipReason::BlankCompanyCode);
            continue;
        }

        let raw = table.cell(row, delivery_column).cloned().unwrap_or_default();
        if is_missing_delivery(&raw) {
            debug!(row, code = %code, "No delivery day, using sentinel date");
            resolution
                .entries
                .insert(code, CompanyDateEntry::sentinel(rules.sentinel_date));
            continue;
        }

        let day = extract_day(&raw);
        match resolve_delivery_date(day, period.year(), period.month(), rules.cutoff_day) {
            Some(date) => {
                let entry = CompanyDateEntry::new(date, day);
                debug!(row, code = %code, day, date = %entry.formatted, "Resolved delivery date");
                resolution.entries.insert(code, entry);
            }
            None => resolution.skip(
                row,
                SkipReason::InvalidDeliveryDate {
                    value: raw.as_text(),
                    day,
                },
            ),
        }
    }

    resolution
}

/// A blank cell, the text `"0"`, or a numeric zero (which renders as `"0"`)
/// has no delivery day.
fn is_missing_delivery(cell: &Cell) -> bool {
    cell.is_blank() || cell.trimmed_text() == "0"
}

/// Extracts the day of month from a raw delivery cell.
///
/// Tried in order: a number between 1 and 31 (fractions truncated), the
/// leading digits of the cell's text split on `/` or `-`, then a full date.
/// Typed dates go through their `YYYY-MM-DD` text like any other cell, and
/// digit runs too long for a `u32` saturate so the month clamp applies.
/// Falls back to day 1.
///
/// # Examples
///
/// ```
/// use payroll_sheets::models::Cell;
/// use payroll_sheets::processing::extract_day;
///
/// assert_eq!(extract_day(&Cell::from("20")), 20);
/// assert_eq!(extract_day(&Cell::from("12/06/2024")), 12);
/// assert_eq!(extract_day(&Cell::from("fine mese")), 1);
/// ```
pub fn extract_day(cell: &Cell) -> u32 {
    day_from_number(cell)
        .or_else(|| day_from_separated_text(cell))
        .or_else(|| day_from_date(cell))
        .unwrap_or(1)
}

fn day_from_number(cell: &Cell) -> Option<u32> {
    let value = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => Decimal::from_str(text.trim()).ok()?,
        Cell::Empty | Cell::Date(_) => return None,
    };
    let day = value.trunc().to_u32()?;
    (1..=31).contains(&day).then_some(day)
}

fn day_from_separated_text(cell: &Cell) -> Option<u32> {
    let text = cell.trimmed_text();
    let separator = if text.contains('/') {
        '/'
    } else if text.contains('-') {
        '-'
    } else {
        return None;
    };
    let first = text.split(separator).next()?;
    if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(first.parse().unwrap_or(u32::MAX))
}

fn day_from_date(cell: &Cell) -> Option<u32> {
    match cell {
        Cell::Date(date) => Some(date.day()),
        Cell::Text(text) => parse_date_text(text).map(|date| date.day()),
        Cell::Empty | Cell::Number(_) => None,
    }
}

/// Returns the year and month a delivery day falls in.
///
/// Days after `cutoff_day` stay in the selected month. Other days move to
/// the following month, rolling December over into January of the next year.
pub fn delivery_month(day: u32, year: i32, month: u32, cutoff_day: u32) -> Option<(i32, u32)> {
    if day > cutoff_day {
        return Some((year, month));
    }
    let next_month = month % 12 + 1;
    let next_year = if next_month < month {
        year.checked_add(1)?
    } else {
        year
    };
    Some((next_year, next_month))
}

/// Resolves a raw delivery day against the selected year and month.
///
/// The day is clamped to the last day of the resolved month. Returns `None`
/// when no valid date results, which only happens for day 0 or years out of
/// range.
///
/// # Examples
///
/// ```
/// use payroll_sheets::processing::resolve_delivery_date;
/// use chrono::NaiveDate;
///
/// // June, day 20: same month.
/// assert_eq!(resolve_delivery_date(20, 2024, 6, 15), NaiveDate::from_ymd_opt(2024, 6, 20));
/// // January, day 10: moves to February.
/// assert_eq!(resolve_delivery_date(10, 2024, 1, 15), NaiveDate::from_ymd_opt(2024, 2, 10));
/// ```
pub fn resolve_delivery_date(
    day: u32,
    year: i32,
    month: u32,
    cutoff_day: u32,
) -> Option<NaiveDate> {
    let (year, month) = delivery_month(day, year, month, cutoff_day)?;
    let last_day = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
}

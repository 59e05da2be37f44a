//! Processed payroll models.
//!
//! This module contains the [`NormalizedRecord`] produced for every
//! operator/company row, the per-company [`CompanyDateEntry`], and the
//! [`RowIssue`] values that record rows skipped along the way.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PeriodInfo;

/// One operator/company row of the processed export.
///
/// `total` is the sum of the employee, parasubordinate and other amounts;
/// the partner amount is carried for display but never added to it.
/// `employee_total` is derived after the whole record set is built and
/// equals the sum of `total` over every record of the same operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// The operator the record is reported to (never blank).
    pub operator: String,
    /// The company code, joined against the delivery dates.
    pub company_code: String,
    /// The company name.
    pub company_name: String,
    /// Employees plus interns.
    pub employee_amount: Decimal,
    /// Parasubordinate workers.
    pub parasubordinate_amount: Decimal,
    /// Other workers.
    pub other_amount: Decimal,
    /// Company partners.
    pub partner_amount: Decimal,
    /// Employee + parasubordinate + other.
    pub total: Decimal,
    /// `total` rendered as currency.
    #[serde(default)]
    pub total_formatted: String,
    /// Delivery date as `DD/MM/YYYY`.
    pub delivery_date: String,
    /// Sum of `total` across all records of this operator.
    pub employee_total: Decimal,
}

impl NormalizedRecord {
    /// Recomputes `total` from its components, or `None` on overflow.
    pub fn computed_total(&self) -> Option<Decimal> {
        self.employee_amount
            .checked_add(self.parasubordinate_amount)?
            .checked_add(self.other_amount)
    }
}

/// The delivery date resolved for one company code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDateEntry {
    /// The resolved calendar date.
    pub date: NaiveDate,
    /// The day of month extracted from the raw cell, before clamping.
    pub day: u32,
    /// The resolved date as `DD/MM/YYYY`.
    pub formatted: String,
}

impl CompanyDateEntry {
    /// Builds an entry for a resolved date.
    pub fn new(date: NaiveDate, day: u32) -> Self {
        Self {
            date,
            day,
            formatted: date.format("%d/%m/%Y").to_string(),
        }
    }

    /// Builds the placeholder entry used when no delivery day is available.
    ///
    /// ```
    /// use payroll_sheets::models::CompanyDateEntry;
    /// use chrono::NaiveDate;
    ///
    /// let entry = CompanyDateEntry::sentinel(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
    /// assert_eq!(entry.day, 1);
    /// assert_eq!(entry.formatted, "01/01/1900");
    /// ```
    pub fn sentinel(date: NaiveDate) -> Self {
        Self::new(date, 1)
    }
}

/// The processing stage a row issue was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    /// Column extraction into records.
    Extraction,
    /// Delivery date resolution.
    DateResolution,
}

/// Why a row was left out of a stage's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The operator cell is empty or whitespace.
    BlankOperator,
    /// The company code cell is empty or whitespace.
    BlankCompanyCode,
    /// The table has no company code column to read.
    MissingCodeColumn {
        /// The expected column header.
        column: String,
    },
    /// The delivery cell produced a day that is not a valid date.
    InvalidDeliveryDate {
        /// The raw cell text.
        value: String,
        /// The day extracted from it.
        day: u32,
    },
    /// The row's amounts add up to more than a decimal can hold.
    AmountOverflow,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::BlankOperator => write!(f, "blank operator"),
            SkipReason::BlankCompanyCode => write!(f, "blank company code"),
            SkipReason::MissingCodeColumn { column } => {
                write!(f, "missing company code column '{}'", column)
            }
            SkipReason::InvalidDeliveryDate { value, day } => {
                write!(f, "invalid delivery day {} from '{}'", day, value)
            }
            SkipReason::AmountOverflow => write!(f, "amount overflow"),
        }
    }
}

/// A row that was skipped, with the stage and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIssue {
    /// 0-based index of the data row.
    pub row: usize,
    /// The stage that skipped it.
    pub stage: ProcessingStage,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// The column extraction strategy that produced a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Fixed column positions.
    Positional,
    /// Case-insensitive header keyword matching.
    HeaderNames,
}

impl std::fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionStrategy::Positional => write!(f, "positional"),
            ExtractionStrategy::HeaderNames => write!(f, "header_names"),
        }
    }
}

/// The complete result of processing one payroll export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedPayroll {
    /// The period the export was processed for.
    pub period: PeriodInfo,
    /// One record per operator/company row.
    pub records: Vec<NormalizedRecord>,
    /// Rows skipped by any stage.
    pub issues: Vec<RowIssue>,
    /// The strategy that produced the records, if any row was extracted.
    pub strategy: Option<ExtractionStrategy>,
}

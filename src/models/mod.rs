//! Core data models for the payroll sheet engine.
//!
//! This module contains the raw table input, the reporting period, and the
//! processed record set handed to the report renderer.

mod period;
mod record;
mod report;
mod table;

pub use period::{PeriodInfo, last_day_of_month};
pub use record::{
    CompanyDateEntry, ExtractionStrategy, NormalizedRecord, ProcessedPayroll, ProcessingStage,
    RowIssue, SkipReason,
};
pub use report::OperatorReport;
pub use table::{Cell, RawTable};

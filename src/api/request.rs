//! Request types for the payroll sheets API.
//!
//! This module defines the JSON request structures for the `/process` endpoint.

use serde::{Deserialize, Serialize};

use crate::config::Locale;
use crate::error::EngineResult;
use crate::models::{Cell, PeriodInfo, RawTable};

/// Request body for the `/process` endpoint.
///
/// Carries the export as a header row plus data rows, and optionally the
/// month to process. Without a period the month is inferred from the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Column header labels.
    pub headers: Vec<String>,
    /// Data rows; cells are `null`, numbers, ISO dates or strings.
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
    /// The selected month.
    #[serde(default)]
    pub period: Option<PeriodRequest>,
}

/// Selected month in a process request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1 to 12.
    pub month: u32,
}

impl PeriodRequest {
    /// Builds the period for the selected month.
    pub fn to_period(self, locale: &Locale) -> EngineResult<PeriodInfo> {
        PeriodInfo::for_month(self.year, self.month, locale)
    }
}

impl ProcessRequest {
    /// Splits the request into the raw table and the selected month.
    pub fn into_parts(self) -> (RawTable, Option<PeriodRequest>) {
        (RawTable::new(self.headers, self.rows), self.period)
    }
}

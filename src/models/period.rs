//! Reporting period model.
//!
//! This module contains the [`PeriodInfo`] type describing the month a
//! payroll export is processed for.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::Locale;
use crate::error::{EngineError, EngineResult};

/// The period a payroll export is processed for.
///
/// Built once, either from an explicit year/month selection or inferred from
/// the date columns of the table, and read-only afterwards. The month used by
/// the delivery date cutoff rule is the month of `start_date`.
///
/// # Example
///
/// ```
/// use payroll_sheets::config::Locale;
/// use payroll_sheets::models::PeriodInfo;
/// use chrono::NaiveDate;
///
/// let period = PeriodInfo::for_month(2024, 2, &Locale::default()).unwrap();
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(period.label, "Febbraio 2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodInfo {
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Human-readable label, e.g. "Giugno 2024".
    pub label: String,
    /// Name of the selected month, e.g. "Giugno".
    pub month_name: String,
}

impl PeriodInfo {
    /// Builds the period covering a whole calendar month.
    ///
    /// Returns `InvalidPeriod` when the month is outside 1..=12 or the year
    /// cannot be represented.
    pub fn for_month(year: i32, month: u32, locale: &Locale) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPeriod { year, month };
        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let end_date = last_day_of_month(year, month)
            .and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or_else(invalid)?;
        let month_name = locale.month_name(month).to_string();

        Ok(Self {
            start_date,
            end_date,
            label: format!("{} {}", month_name, year),
            month_name,
        })
    }

    /// Builds a period bounded by two observed dates.
    ///
    /// When both dates fall in the same month the label is that month,
    /// otherwise it names both ends, e.g. "Giugno 2024 - Agosto 2024".
    pub fn spanning(start_date: NaiveDate, end_date: NaiveDate, locale: &Locale) -> Self {
        let start_label = format!(
            "{} {}",
            locale.month_name(start_date.month()),
            start_date.year()
        );
        let label = if (start_date.year(), start_date.month()) == (end_date.year(), end_date.month())
        {
            start_label
        } else {
            format!(
                "{} - {} {}",
                start_label,
                locale.month_name(end_date.month()),
                end_date.year()
            )
        };

        Self {
            start_date,
            end_date,
            label,
            month_name: locale.month_name(start_date.month()).to_string(),
        }
    }

    /// The selected year.
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// The selected month (1-based).
    pub fn month(&self) -> u32 {
        self.start_date.month()
    }

    /// Name of the folder the per-operator documents are collected in.
    ///
    /// ```
    /// use payroll_sheets::config::Locale;
    /// use payroll_sheets::models::PeriodInfo;
    ///
    /// let period = PeriodInfo::for_month(2024, 6, &Locale::default()).unwrap();
    /// assert_eq!(period.folder_name(), "Fogli_paghe_giugno");
    /// ```
    pub fn folder_name(&self) -> String {
        format!("Fogli_paghe_{}", self.month_name.to_lowercase())
    }
}

/// Returns the number of days in a month, accounting for leap years.
///
/// ```
/// use payroll_sheets::models::last_day_of_month;
///
/// assert_eq!(last_day_of_month(2024, 2), Some(29));
/// assert_eq!(last_day_of_month(2023, 2), Some(28));
/// assert_eq!(last_day_of_month(2024, 13), None);
/// ```
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?;
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
}

//! End-to-end processing of one payroll export.
//!
//! Headers are cleaned, records extracted, delivery dates resolved and
//! joined on company code, and operator totals aggregated over the full
//! record set.

use std::collections::HashMap;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::info;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{CompanyDateEntry, NormalizedRecord, PeriodInfo, ProcessedPayroll, RawTable};

use super::delivery_date::resolve_dates;
use super::normalizer::{DEFAULT_STRATEGIES, extract_records};
use super::number_format::format_currency;
use super::period_inference::infer_period;

/// Normalizes a raw table for the given period.
///
/// Fails when the table has no columns or no operator column can be
/// resolved. Row-level defects never fail the call; they are returned in
/// [`ProcessedPayroll::issues`].
pub fn normalize(
    table: &RawTable,
    period: &PeriodInfo,
    config: &EngineConfig,
) -> EngineResult<ProcessedPayroll> {
    let start_time = Instant::now();
    let table = table.with_clean_headers();
    let layout = config.layout();

    let extraction = extract_records(&table, layout, DEFAULT_STRATEGIES)?;
    let resolution = resolve_dates(&table, period, &layout.delivery);
    let sentinel = CompanyDateEntry::sentinel(layout.delivery.sentinel_date).formatted;

    let mut records = extraction.records;
    for record in &mut records {
        record.delivery_date = resolution
            .formatted_for(&record.company_code)
            .unwrap_or(&sentinel)
            .to_string();
        record.total_formatted = format_currency(record.total, config.currency());
    }
    apply_employee_totals(&mut records);

    let mut issues = extraction.issues;
    issues.extend(resolution.issues);

    info!(
        period = %period.label,
        rows = table.row_count(),
        records = records.len(),
        companies_dated = resolution.entries.len(),
        skipped = issues.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Payroll export normalized"
    );

    Ok(ProcessedPayroll {
        period: period.clone(),
        records,
        issues,
        strategy: extraction.strategy,
    })
}

/// Normalizes a raw table, inferring the period when none is selected.
///
/// The inferred period comes from the table's date columns, or the current
/// month when the table holds no dates. The returned payroll carries the
/// period that was actually used.
pub fn normalize_and_resolve(
    table: &RawTable,
    period: Option<PeriodInfo>,
    config: &EngineConfig,
) -> EngineResult<ProcessedPayroll> {
    let period = match period {
        Some(period) => period,
        None => {
            let today = chrono::Local::now().date_naive();
            infer_period(&table.with_clean_headers(), today, config.locale())
        }
    };
    normalize(table, &period, config)
}

/// Sets every record's `employee_total` to the sum of `total` over all
/// records of the same operator. The sum saturates at the decimal bounds.
pub fn apply_employee_totals(records: &mut [NormalizedRecord]) {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for record in records.iter() {
        let total = totals.entry(record.operator.clone()).or_default();
        *total = total.saturating_add(record.total);
    }
    for record in records.iter_mut() {
        record.employee_total = totals
            .get(&record.operator)
            .copied()
            .unwrap_or(Decimal::ZERO);
    }
}

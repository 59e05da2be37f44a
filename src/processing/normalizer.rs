//! Column extraction into normalized records.
//!
//! Two strategies turn raw rows into [`NormalizedRecord`]s:
//!
//! - [`ExtractionStrategy::Positional`] reads the fixed column positions of
//!   the standard export and groups rows by operator.
//! - [`ExtractionStrategy::HeaderNames`] locates each field by keywords in
//!   the header labels.
//!
//! [`extract_records`] runs an ordered list of strategies and keeps the
//! first one that yields at least one record.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::{ColumnPositions, LayoutConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Cell, ExtractionStrategy, NormalizedRecord, ProcessingStage, RawTable, RowIssue, SkipReason,
};

use super::number_format::to_number;

/// Strategies tried by default, in order.
pub const DEFAULT_STRATEGIES: &[ExtractionStrategy] = &[
    ExtractionStrategy::Positional,
    ExtractionStrategy::HeaderNames,
];

/// Records extracted by one strategy, before dates and operator totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Extracted records with empty delivery dates and zero operator totals.
    pub records: Vec<NormalizedRecord>,
    /// Rows the strategy skipped.
    pub issues: Vec<RowIssue>,
    /// The strategy that produced the records, `None` when nothing was extracted.
    pub strategy: Option<ExtractionStrategy>,
}

impl Extraction {
    fn new(strategy: ExtractionStrategy) -> Self {
        Self {
            strategy: Some(strategy),
            ..Self::default()
        }
    }

    fn skip_blank_operator(&mut self, row: usize) {
        warn!(row, "Skipping row with blank operator");
        self.issues.push(RowIssue {
            row,
            stage: ProcessingStage::Extraction,
            reason: SkipReason::BlankOperator,
        });
    }

    fn skip_overflow(&mut self, row: usize) {
        warn!(row, "Skipping row whose amounts overflow");
        self.issues.push(RowIssue {
            row,
            stage: ProcessingStage::Extraction,
            reason: SkipReason::AmountOverflow,
        });
    }
}

/// Extracts records with the first strategy that yields any.
///
/// Fails with `EmptyTable` when the table has no columns, and with
/// `NoOperatorColumn` when the name-based strategy is reached on a table
/// with data rows but no operator header. When no strategy yields records
/// the result is empty and carries the issues of the last strategy tried.
pub fn extract_records(
    table: &RawTable,
    layout: &LayoutConfig,
    strategies: &[ExtractionStrategy],
) -> EngineResult<Extraction> {
    if table.column_count() == 0 {
        return Err(EngineError::EmptyTable);
    }

    let mut last = Extraction::default();
    for &strategy in strategies {
        let extraction = match strategy {
            ExtractionStrategy::Positional => extract_positional(table, layout),
            ExtractionStrategy::HeaderNames => extract_by_header_names(table, layout)?,
        };

        if !extraction.records.is_empty() {
            info!(
                strategy = %strategy,
                records = extraction.records.len(),
                skipped = extraction.issues.len(),
                "Extracted payroll rows"
            );
            return Ok(extraction);
        }
        debug!(strategy = %strategy, "Strategy yielded no rows");
        last = extraction;
    }

    last.strategy = None;
    Ok(last)
}

/// Resolves the operator column for the positional strategy.
///
/// Uses the configured position when the table is wide enough, otherwise
/// the first header containing the operator keyword, otherwise column 0.
fn operator_column(table: &RawTable, layout: &LayoutConfig) -> usize {
    if layout.positions.operator < table.column_count() {
        return layout.positions.operator;
    }
    table
        .find_column_containing(&[layout.operator_keyword.as_str()])
        .unwrap_or(0)
}

fn text_at(table: &RawTable, row: usize, column: usize) -> String {
    table
        .cell(row, column)
        .map(Cell::trimmed_text)
        .unwrap_or_default()
}

fn number_at(table: &RawTable, row: usize, column: usize) -> Decimal {
    table.cell(row, column).map(to_number).unwrap_or(Decimal::ZERO)
}

fn extract_positional(table: &RawTable, layout: &LayoutConfig) -> Extraction {
    let mut extraction = Extraction::new(ExtractionStrategy::Positional);
    let operator_column = operator_column(table, layout);
    debug!(operator_column, "Positional extraction");

    // Rows grouped per operator, operators in first-seen order.
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    for row in 0..table.row_count() {
        let operator = text_at(table, row, operator_column);
        if operator.is_empty() {
            extraction.skip_blank_operator(row);
            continue;
        }
        match group_index.get(&operator) {
            Some(&index) => groups[index].1.push(row),
            None => {
                group_index.insert(operator.clone(), groups.len());
                groups.push((operator, vec![row]));
            }
        }
    }

    for (operator, rows) in groups {
        for row in rows {
            match positional_record(table, row, &operator, &layout.positions) {
                Some(record) => extraction.records.push(record),
                None => extraction.skip_overflow(row),
            }
        }
    }
    extraction
}

fn positional_record(
    table: &RawTable,
    row: usize,
    operator: &str,
    positions: &ColumnPositions,
) -> Option<NormalizedRecord> {
    let employee_amount = positions
        .employee
        .iter()
        .try_fold(Decimal::ZERO, |sum, &column| {
            sum.checked_add(number_at(table, row, column))
        })?;
    let parasubordinate_amount = number_at(table, row, positions.parasubordinate);
    let other_amount = number_at(table, row, positions.other);

    let mut record = NormalizedRecord {
        operator: operator.to_string(),
        company_code: text_at(table, row, positions.company_code),
        company_name: text_at(table, row, positions.company_name),
        employee_amount,
        parasubordinate_amount,
        other_amount,
        partner_amount: number_at(table, row, positions.partner),
        total: Decimal::ZERO,
        total_formatted: String::new(),
        delivery_date: String::new(),
        employee_total: Decimal::ZERO,
    };
    record.total = record.computed_total()?;
    Some(record)
}

/// Column indices found by header keywords.
#[derive(Debug, Default)]
struct HeaderColumns {
    company_code: Option<usize>,
    company_name: Option<usize>,
    employee: Option<usize>,
    parasubordinate: Option<usize>,
    other: Option<usize>,
    total: Option<usize>,
    partner: Option<usize>,
}

fn extract_by_header_names(table: &RawTable, layout: &LayoutConfig) -> EngineResult<Extraction> {
    let mut extraction = Extraction::new(ExtractionStrategy::HeaderNames);
    let keywords = &layout.headers;

    let Some(operator_column) = table.find_column_containing(&keywords.operator) else {
        if table.row_count() > 0 {
            return Err(EngineError::NoOperatorColumn {
                rows: table.row_count(),
            });
        }
        return Ok(extraction);
    };
    let columns = HeaderColumns {
        company_code: table.find_column_containing(&keywords.company_code),
        company_name: table.find_column_containing(&keywords.company_name),
        employee: table.find_column_containing(&keywords.employee),
        parasubordinate: table.find_column_containing(&keywords.parasubordinate),
        other: table.find_column_containing(&keywords.other),
        total: table.find_column_containing(&keywords.total),
        partner: table.find_column_containing(&keywords.partner),
    };
    debug!(operator_column, ?columns, "Header name extraction");

    let text = |row: usize, column: Option<usize>| {
        column
            .map(|column| text_at(table, row, column))
            .unwrap_or_default()
    };
    let number = |row: usize, column: Option<usize>| {
        column
            .map(|column| number_at(table, row, column))
            .unwrap_or(Decimal::ZERO)
    };

    let mut rows = Vec::new();
    for row in 0..table.row_count() {
        let operator = text_at(table, row, operator_column);
        if operator.is_empty() {
            extraction.skip_blank_operator(row);
            continue;
        }
        rows.push(row);
        extraction.records.push(NormalizedRecord {
            operator,
            company_code: text(row, columns.company_code),
            company_name: text(row, columns.company_name),
            employee_amount: number(row, columns.employee),
            parasubordinate_amount: number(row, columns.parasubordinate),
            other_amount: number(row, columns.other),
            partner_amount: number(row, columns.partner),
            total: number(row, columns.total),
            total_formatted: String::new(),
            delivery_date: String::new(),
            employee_total: Decimal::ZERO,
        });
    }

    if extraction.records.iter().all(|record| record.total.is_zero()) {
        let records = std::mem::take(&mut extraction.records);
        for (row, mut record) in rows.into_iter().zip(records) {
            match record.computed_total() {
                Some(total) => {
                    record.total = total;
                    extraction.records.push(record);
                }
                None => extraction.skip_overflow(row),
            }
        }
    }
    Ok(extraction)
}

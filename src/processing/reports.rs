//! Per-operator report grouping for the document renderer.

use rust_decimal::Decimal;

use crate::config::CurrencyFormat;
use crate::models::{NormalizedRecord, OperatorReport};

use super::number_format::format_currency;

/// Returns the document file name for an operator.
///
/// # Example
///
/// ```
/// use payroll_sheets::processing::report_file_name;
///
/// assert_eq!(report_file_name(" Mario Rossi "), "Report_Mario_Rossi.pdf");
/// ```
pub fn report_file_name(operator: &str) -> String {
    format!("Report_{}.pdf", operator.trim().replace(' ', "_"))
}

/// Groups records into one report per operator, operators in first-seen order.
///
/// Report totals saturate at the decimal bounds.
pub fn group_by_operator(
    records: &[NormalizedRecord],
    format: &CurrencyFormat,
) -> Vec<OperatorReport> {
    let mut reports: Vec<OperatorReport> = Vec::new();
    for record in records {
        match reports
            .iter_mut()
            .find(|report| report.operator == record.operator)
        {
            Some(report) => report.records.push(record.clone()),
            None => reports.push(OperatorReport {
                operator: record.operator.clone(),
                file_name: report_file_name(&record.operator),
                records: vec![record.clone()],
                total: Decimal::ZERO,
                total_formatted: String::new(),
            }),
        }
    }

    for report in &mut reports {
        report.total = report
            .records
            .iter()
            .fold(Decimal::ZERO, |sum, record| sum.saturating_add(record.total));
        report.total_formatted = format_currency(report.total, format);
    }
    reports
}

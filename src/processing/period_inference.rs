//! Reporting period inference.
//!
//! When the caller does not select a month, the period is taken from the
//! dates found in the table itself.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::config::Locale;
use crate::models::{Cell, PeriodInfo, RawTable};

const DATE_FORMATS: [&str; 6] = [
    "%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d",
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Number of leading non-empty values inspected when sniffing a column.
const SAMPLE_SIZE: usize = 5;

/// Parses date or date-time text, day first.
///
/// # Examples
///
/// ```
/// use payroll_sheets::processing::parse_date_text;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 6, 20);
/// assert_eq!(parse_date_text("20/06/2024"), expected);
/// assert_eq!(parse_date_text("2024-06-20 00:00:00"), expected);
/// assert_eq!(parse_date_text("domani"), None);
/// ```
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|datetime| datetime.date())
        })
}

fn cell_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(text) => parse_date_text(text),
        Cell::Empty | Cell::Number(_) => None,
    }
}

/// Returns the columns that may hold dates.
///
/// Columns whose header contains `data` win outright. Otherwise a column
/// qualifies if it holds typed dates, or if one of its first few non-empty
/// text values contains a `/`.
pub fn date_columns(table: &RawTable) -> Vec<usize> {
    let named: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.to_lowercase().contains("data"))
        .map(|(index, _)| index)
        .collect();
    if !named.is_empty() {
        return named;
    }

    (0..table.column_count())
        .filter(|&column| {
            let cells = || table.rows.iter().filter_map(|row| row.get(column));
            cells().any(|cell| matches!(cell, Cell::Date(_)))
                || cells()
                    .filter(|cell| !cell.is_blank())
                    .take(SAMPLE_SIZE)
                    .any(|cell| matches!(cell, Cell::Text(text) if text.contains('/')))
        })
        .collect()
}

/// Infers the reporting period from the table's date columns.
///
/// The period spans the earliest to the latest parsable date. With no
/// parsable date at all, the month containing `today` is used.
pub fn infer_period(table: &RawTable, today: NaiveDate, locale: &Locale) -> PeriodInfo {
    let columns = date_columns(table);
    debug!(?columns, "Candidate date columns");

    let bounds = columns
        .iter()
        .flat_map(|&column| table.rows.iter().filter_map(move |row| row.get(column)))
        .filter_map(cell_date)
        .fold(None, |bounds: Option<(NaiveDate, NaiveDate)>, date| {
            Some(match bounds {
                Some((min, max)) => (min.min(date), max.max(date)),
                None => (date, date),
            })
        });

    match bounds {
        Some((min, max)) => {
            let period = PeriodInfo::spanning(min, max, locale);
            info!(period = %period.label, "Inferred period from table dates");
            period
        }
        None => {
            info!("No dates found in table, using the current month");
            PeriodInfo::for_month(today.year(), today.month(), locale)
                .unwrap_or_else(|_| PeriodInfo::spanning(today, today, locale))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table(headers: &[&str], rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable::new(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    #[test]
    fn test_parse_date_text_formats() {
        assert_eq!(parse_date_text("05/03/2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date_text("05/03/24"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date_text("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date_text("05-03-2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date_text("05.03.2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date_text("2024-03-05T08:30:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date_text(" 05/03/2024 10:15 "), Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_parse_date_text_rejects_garbage() {
        assert_eq!(parse_date_text(""), None);
        assert_eq!(parse_date_text("20"), None);
        assert_eq!(parse_date_text("31/02/2024"), None);
    }

    #[test]
    fn test_date_columns_prefers_named_columns() {
        let t = table(
            &["Operatore", "Data elaborazione", "Note"],
            vec![vec![
                Cell::from("Mario"),
                Cell::from("x"),
                Cell::from("01/02/2024"),
            ]],
        );
        assert_eq!(date_columns(&t), vec![1]);
    }

    #[test]
    fn test_date_columns_sniffs_slashes_and_typed_dates() {
        let t = table(
            &["Operatore", "Periodo", "Importo", "Giorno"],
            vec![
                vec![
                    Cell::from("Mario"),
                    Cell::from("01/02/2024"),
                    Cell::from(3),
                    Cell::Date(date(2024, 2, 9)),
                ],
                vec![Cell::from("Anna"), Cell::Empty, Cell::from(4), Cell::Empty],
            ],
        );
        assert_eq!(date_columns(&t), vec![1, 3]);
    }

    #[test]
    fn test_infer_period_single_month() {
        let t = table(
            &["Data"],
            vec![
                vec![Cell::from("03/06/2024")],
                vec![Cell::from("28/06/2024")],
                vec![Cell::from("n/d")],
            ],
        );
        let period = infer_period(&t, date(2030, 1, 1), &Locale::default());
        assert_eq!(period.start_date, date(2024, 6, 3));
        assert_eq!(period.end_date, date(2024, 6, 28));
        assert_eq!(period.label, "Giugno 2024");
        assert_eq!(period.month(), 6);
    }

    #[test]
    fn test_infer_period_spanning_months() {
        let t = table(
            &["Data inizio", "Data fine"],
            vec![vec![
                Cell::Date(date(2024, 5, 20)),
                Cell::Date(date(2024, 7, 2)),
            ]],
        );
        let period = infer_period(&t, date(2030, 1, 1), &Locale::default());
        assert_eq!(period.label, "Maggio 2024 - Luglio 2024");
        assert_eq!(period.month(), 5);
    }

    #[test]
    fn test_infer_period_falls_back_to_current_month() {
        let t = table(&["Operatore"], vec![vec![Cell::from("Mario")]]);
        let period = infer_period(&t, date(2025, 2, 14), &Locale::default());
        assert_eq!(period.start_date, date(2025, 2, 1));
        assert_eq!(period.end_date, date(2025, 2, 28));
        assert_eq!(period.label, "Febbraio 2025");
    }
}

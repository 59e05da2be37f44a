//! Delimited text loader.
//!
//! Exports arrive as CSV with an unknown separator, usually `;` from Italian
//! spreadsheet software. The separator is sniffed from the header line.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{Cell, RawTable};

/// Candidate separators, in order of preference on ties.
const DELIMITERS: [u8; 4] = [b';', b',', b'\t', b'|'];

const BOM: &str = "\u{feff}";

/// Picks the separator that occurs most often in the header line.
///
/// Falls back to `,` when none of the candidates occurs.
///
/// # Example
///
/// ```
/// use payroll_sheets::input::sniff_delimiter;
///
/// assert_eq!(sniff_delimiter("Operatore;Codice;Consegna"), b';');
/// assert_eq!(sniff_delimiter("Operatore\tCodice"), b'\t');
/// assert_eq!(sniff_delimiter("Operatore"), b',');
/// ```
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    let mut best = (b',', 0);
    for delimiter in DELIMITERS {
        let count = header.bytes().filter(|&byte| byte == delimiter).count();
        if count > best.1 {
            best = (delimiter, count);
        }
    }
    best.0
}

/// Loads a delimited export from a reader.
///
/// The first record is the header row. Rows may be shorter or longer than
/// the header. Empty fields become [`Cell::Empty`], everything else
/// [`Cell::Text`] with its original spacing.
pub fn load_delimited<R: Read>(mut reader: R) -> EngineResult<RawTable> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|err| EngineError::InputParseError {
            line: 0,
            message: err.to_string(),
        })?;
    let text = String::from_utf8(bytes).map_err(|err| {
        let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
        EngineError::InputParseError {
            line: valid.iter().filter(|&&byte| byte == b'\n').count() as u64 + 1,
            message: err.utf8_error().to_string(),
        }
    })?;
    let text = text.strip_prefix(BOM).unwrap_or(&text);

    let delimiter = sniff_delimiter(text);
    debug!(delimiter = %char::from(delimiter), "Sniffed delimiter");

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr
        .headers()
        .map_err(read_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(read_error)?;
        rows.push(record_cells(&record));
    }

    let table = RawTable::new(headers, rows);
    info!(
        columns = table.column_count(),
        rows = table.row_count(),
        "Loaded delimited input"
    );
    Ok(table)
}

/// Loads a delimited export from a file.
///
/// A file that cannot be opened is reported as a read error at line 0.
pub fn load_delimited_file(path: impl AsRef<Path>) -> EngineResult<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| EngineError::InputParseError {
        line: 0,
        message: format!("{}: {}", path.display(), err),
    })?;
    load_delimited(file)
}

fn record_cells(record: &StringRecord) -> Vec<Cell> {
    record
        .iter()
        .map(|field| {
            if field.is_empty() {
                Cell::Empty
            } else {
                Cell::from(field)
            }
        })
        .collect()
}

fn read_error(err: csv::Error) -> EngineError {
    EngineError::InputParseError {
        line: err.position().map(|position| position.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

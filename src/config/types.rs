//! Configuration types for payroll sheet processing.
//!
//! These structures are deserialized from the YAML files of a configuration
//! directory. Every type also implements [`Default`] with the values of the
//! standard monthly export, so the processing stage can run without any file
//! on disk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed column positions of the standard export (0-indexed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPositions {
    /// Column holding the operator name.
    pub operator: usize,
    /// Column holding the company code.
    pub company_code: usize,
    /// Column holding the company name.
    pub company_name: usize,
    /// Columns summed into the employee amount.
    pub employee: Vec<usize>,
    /// Column holding the parasubordinate amount.
    pub parasubordinate: usize,
    /// Column holding the partner amount.
    pub partner: usize,
    /// Column holding the other amount.
    pub other: usize,
}

impl Default for ColumnPositions {
    fn default() -> Self {
        Self {
            operator: 1,
            company_code: 2,
            company_name: 3,
            employee: vec![11, 12],
            parasubordinate: 13,
            partner: 14,
            other: 15,
        }
    }
}

/// Header keywords used by the name-based extraction strategy.
///
/// A field maps to the first column whose label contains any of its
/// keywords, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderKeywords {
    /// Keywords for the operator column.
    pub operator: Vec<String>,
    /// Keywords for the company code column.
    pub company_code: Vec<String>,
    /// Keywords for the company name column.
    pub company_name: Vec<String>,
    /// Keywords for the employee amount column.
    pub employee: Vec<String>,
    /// Keywords for the parasubordinate amount column.
    pub parasubordinate: Vec<String>,
    /// Keywords for the other amount column.
    pub other: Vec<String>,
    /// Keywords for a precomputed total column.
    pub total: Vec<String>,
    /// Keywords for the partner amount column.
    pub partner: Vec<String>,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for HeaderKeywords {
    fn default() -> Self {
        Self {
            operator: words(&["operatore", "descrizione oper"]),
            company_code: words(&["codice"]),
            company_name: words(&["ragione sociale", "azienda"]),
            employee: words(&["dipendenti"]),
            parasubordinate: words(&["parasub"]),
            other: words(&["altro"]),
            total: words(&["totale"]),
            partner: words(&["soci"]),
        }
    }
}

/// Rules for resolving per-company delivery dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRules {
    /// Exact header of the column holding the raw delivery day.
    pub delivery_column: String,
    /// Exact header of the column holding the company code.
    pub code_column: String,
    /// Days strictly after this one stay in the selected month.
    pub cutoff_day: u32,
    /// Placeholder date for companies without a usable delivery day.
    pub sentinel_date: NaiveDate,
}

impl Default for DeliveryRules {
    fn default() -> Self {
        Self {
            delivery_column: "Consegna".to_string(),
            code_column: "Codice".to_string(),
            cutoff_day: 15,
            sentinel_date: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default(),
        }
    }
}

/// Column layout of the payroll export (`layout.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Positional layout used by the primary strategy.
    pub positions: ColumnPositions,
    /// Keyword searched when the table is too narrow for the operator position.
    #[serde(default = "default_operator_keyword")]
    pub operator_keyword: String,
    /// Keywords used by the name-based strategy.
    pub headers: HeaderKeywords,
    /// Delivery date resolution rules.
    pub delivery: DeliveryRules,
}

fn default_operator_keyword() -> String {
    "operatore".to_string()
}

/// Currency rendering spec.
///
/// # Example
///
/// ```
/// use payroll_sheets::config::CurrencyFormat;
///
/// let format = CurrencyFormat::default();
/// assert_eq!(format.symbol, "€");
/// assert_eq!(format.thousands_separator, '.');
/// assert_eq!(format.decimal_separator, ',');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// Symbol printed before the amount, followed by a space.
    pub symbol: String,
    /// Separator between groups of three integer digits.
    pub thousands_separator: char,
    /// Separator between integer and fractional digits.
    pub decimal_separator: char,
    /// Number of fractional digits.
    pub decimals: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "€".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            decimals: 2,
        }
    }
}

/// Locale data (`format.yaml`): currency format and month names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    /// Currency rendering spec.
    pub currency: CurrencyFormat,
    /// Month names, January first.
    pub month_names: Vec<String>,
}

impl Locale {
    /// Returns the name of a 1-based month, or an empty string when out of range.
    pub fn month_name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|index| self.month_names.get(index as usize))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            month_names: words(&[
                "Gennaio",
                "Febbraio",
                "Marzo",
                "Aprile",
                "Maggio",
                "Giugno",
                "Luglio",
                "Agosto",
                "Settembre",
                "Ottobre",
                "Novembre",
                "Dicembre",
            ]),
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    layout: LayoutConfig,
    locale: Locale,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(layout: LayoutConfig, locale: Locale) -> Self {
        Self { layout, locale }
    }

    /// Returns the column layout.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the locale data.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Returns the currency rendering spec.
    pub fn currency(&self) -> &CurrencyFormat {
        &self.locale.currency
    }
}

//! Numeric coercion and currency rendering.
//!
//! Spreadsheet amounts arrive as numbers, plain decimal text, or European
//! text such as `"€ 1.234,56"`. [`to_number`] turns any of them into a
//! [`Decimal`] and never fails; [`format_currency`] renders an amount
//! according to a [`CurrencyFormat`] passed in as data.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::CurrencyFormat;
use crate::models::Cell;

/// Coerces a cell to a decimal amount.
///
/// Empty cells and dates are zero. Text is tried, in order, as a plain
/// decimal, as European text (dots dropped, comma as decimal point), and as
/// European text with `€`/`$` removed. Anything else is zero.
///
/// # Examples
///
/// ```
/// use payroll_sheets::models::Cell;
/// use payroll_sheets::processing::to_number;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(to_number(&Cell::from("1.234,56")), Decimal::from_str("1234.56").unwrap());
/// assert_eq!(to_number(&Cell::from("€ 12,50")), Decimal::from_str("12.50").unwrap());
/// assert_eq!(to_number(&Cell::from("n/d")), Decimal::ZERO);
/// assert_eq!(to_number(&Cell::Empty), Decimal::ZERO);
/// ```
pub fn to_number(value: &Cell) -> Decimal {
    match value {
        Cell::Empty | Cell::Date(_) => Decimal::ZERO,
        Cell::Number(number) => *number,
        Cell::Text(text) => parse_number_text(text).unwrap_or(Decimal::ZERO),
    }
}

/// Parses number text, returning `None` when every strategy fails.
pub fn parse_number_text(text: &str) -> Option<Decimal> {
    parse_plain(text)
        .or_else(|| parse_european(text))
        .or_else(|| parse_european(&text.replace(['€', '$'], "")))
}

fn parse_plain(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .ok()
        .or_else(|| parse_scientific(text))
}

/// Mantissa/exponent text such as `1.5E+03`, as spreadsheets export large numbers.
fn parse_scientific(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = text.split_once(['e', 'E'])?;
    let mantissa = Decimal::from_str(mantissa).ok()?;
    let exponent: i32 = exponent.parse().ok()?;
    if exponent.unsigned_abs() > MAX_EXPONENT {
        return None;
    }
    let factor = Decimal::from(10u64.checked_pow(exponent.unsigned_abs())?);
    if exponent >= 0 {
        mantissa.checked_mul(factor)
    } else {
        mantissa.checked_div(factor)
    }
}

const MAX_EXPONENT: u32 = 18;

fn parse_european(text: &str) -> Option<Decimal> {
    parse_plain(&text.replace('.', "").replace(',', "."))
}

/// Renders an amount, or `None` if it cannot be represented.
///
/// Rounds half away from zero to `format.decimals` places.
pub fn format_amount(amount: Decimal, format: &CurrencyFormat) -> Option<String> {
    let rounded =
        amount.round_dp_with_strategy(format.decimals, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let magnitude = rounded.abs();
    let integer = magnitude.trunc().to_u128()?;
    let scale = Decimal::from(10u64.checked_pow(format.decimals)?);
    let fraction = magnitude.fract().checked_mul(scale)?.trunc().to_u64()?;

    let mut rendered = format!(
        "{} {}{}",
        format.symbol,
        sign,
        group_thousands(&integer.to_string(), format.thousands_separator)
    );
    if format.decimals > 0 {
        rendered.push(format.decimal_separator);
        rendered.push_str(&format!(
            "{:0width$}",
            fraction,
            width = format.decimals as usize
        ));
    }
    Some(rendered)
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Coerces a value with [`to_number`] and renders it as currency.
///
/// Falls back to the value's plain text when the amount cannot be rendered.
pub fn format_currency<V: Into<Cell>>(value: V, format: &CurrencyFormat) -> String {
    let cell = value.into();
    format_amount(to_number(&cell), format).unwrap_or_else(|| cell.as_text())
}

/// Renders a value with the default Italian currency format.
///
/// # Examples
///
/// ```
/// use payroll_sheets::processing::to_currency_string;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(to_currency_string(Decimal::from_str("1234.5").unwrap()), "€ 1.234,50");
/// assert_eq!(to_currency_string("abc"), "€ 0,00");
/// ```
pub fn to_currency_string<V: Into<Cell>>(value: V) -> String {
    format_currency(value, &CurrencyFormat::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(to_number(&Cell::Empty), Decimal::ZERO);
        assert_eq!(to_number(&text("")), Decimal::ZERO);
        assert_eq!(to_number(&text("   ")), Decimal::ZERO);
    }

    #[test]
    fn test_number_cell_passes_through() {
        assert_eq!(to_number(&Cell::Number(dec("42.75"))), dec("42.75"));
        assert_eq!(to_number(&Cell::Number(dec("-3"))), dec("-3"));
    }

    #[test]
    fn test_date_cell_is_zero() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(to_number(&Cell::Date(date)), Decimal::ZERO);
    }

    #[test]
    fn test_plain_decimal_text() {
        assert_eq!(to_number(&text("1234.56")), dec("1234.56"));
        assert_eq!(to_number(&text(" 17 ")), dec("17"));
        assert_eq!(to_number(&text("-8.5")), dec("-8.5"));
        assert_eq!(to_number(&text("1e3")), dec("1000"));
        assert_eq!(to_number(&text("1.5E+03")), dec("1500"));
        assert_eq!(to_number(&text("25e-2")), dec("0.25"));
    }

    #[test]
    fn test_huge_exponent_is_zero() {
        assert_eq!(to_number(&text("1e400")), Decimal::ZERO);
    }

    #[test]
    fn test_european_text() {
        assert_eq!(to_number(&text("1.234,56")), dec("1234.56"));
        assert_eq!(to_number(&text("12.345.678,9")), dec("12345678.9"));
        assert_eq!(to_number(&text("0,5")), dec("0.5"));
    }

    #[test]
    fn test_dot_only_text_reads_as_plain_decimal() {
        assert_eq!(to_number(&text("1.234")), dec("1.234"));
    }

    #[test]
    fn test_comma_only_text_reads_as_european() {
        assert_eq!(to_number(&text("1,234")), dec("1.234"));
    }

    #[test]
    fn test_currency_symbols_are_stripped() {
        assert_eq!(to_number(&text("€ 1.234,50")), dec("1234.50"));
        assert_eq!(to_number(&text("$12,00")), dec("12.00"));
        assert_eq!(to_number(&text("€ -7,25")), dec("-7.25"));
    }

    #[test]
    fn test_unparsable_text_is_zero() {
        assert_eq!(to_number(&text("abc")), Decimal::ZERO);
        assert_eq!(to_number(&text("12abc")), Decimal::ZERO);
        assert_eq!(to_number(&text("nan")), Decimal::ZERO);
        assert_eq!(to_number(&text("€")), Decimal::ZERO);
    }

    #[test]
    fn test_format_spec_example() {
        assert_eq!(to_currency_string(dec("1234.5")), "€ 1.234,50");
    }

    #[test]
    fn test_format_small_and_zero_amounts() {
        assert_eq!(to_currency_string(Decimal::ZERO), "€ 0,00");
        assert_eq!(to_currency_string(dec("5")), "€ 5,00");
        assert_eq!(to_currency_string(dec("999.999")), "€ 1.000,00");
    }

    #[test]
    fn test_format_large_amount() {
        assert_eq!(to_currency_string(dec("1234567.891")), "€ 1.234.567,89");
    }

    #[test]
    fn test_format_negative_amount_puts_sign_after_symbol() {
        assert_eq!(to_currency_string(dec("-1234.5")), "€ -1.234,50");
    }

    #[test]
    fn test_format_negative_rounding_to_zero_has_no_sign() {
        assert_eq!(to_currency_string(dec("-0.001")), "€ 0,00");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(to_currency_string(dec("0.125")), "€ 0,13");
        assert_eq!(to_currency_string(dec("-0.125")), "€ -0,13");
    }

    #[test]
    fn test_format_coerces_text() {
        assert_eq!(to_currency_string("1.234,5"), "€ 1.234,50");
        assert_eq!(to_currency_string("garbage"), "€ 0,00");
    }

    #[test]
    fn test_format_with_custom_spec() {
        let format = CurrencyFormat {
            symbol: "$".to_string(),
            thousands_separator: ',',
            decimal_separator: '.',
            decimals: 0,
        };
        assert_eq!(format_currency(dec("1234567.5"), &format), "$ 1,234,568");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", '.'), "1");
        assert_eq!(group_thousands("123", '.'), "123");
        assert_eq!(group_thousands("1234", '.'), "1.234");
        assert_eq!(group_thousands("123456", '.'), "123.456");
        assert_eq!(group_thousands("1234567", '.'), "1.234.567");
    }

    proptest! {
        #[test]
        fn prop_to_number_never_panics(input in ".*") {
            let _ = to_number(&Cell::Text(input));
        }

        #[test]
        fn prop_letters_only_text_is_zero(input in "[a-df-zA-DF-Z ]{1,20}") {
            prop_assert_eq!(to_number(&Cell::Text(input)), Decimal::ZERO);
        }

        #[test]
        fn prop_currency_round_trip(cents in -1_000_000_000_000i64..1_000_000_000_000i64) {
            let amount = Decimal::new(cents, 2);
            let rendered = to_currency_string(amount);
            let stripped = rendered.trim_start_matches('€').trim();
            let parsed = to_number(&Cell::from(stripped));
            prop_assert!((parsed - amount).abs() < Decimal::new(1, 2));
        }

        #[test]
        fn prop_european_text_parses(whole in 0u64..1_000_000_000u64, cents in 0u32..100u32) {
            let rendered = format!("{},{:02}", group_thousands(&whole.to_string(), '.'), cents);
            let expected = Decimal::from(whole) + Decimal::new(i64::from(cents), 2);
            prop_assert_eq!(to_number(&Cell::from(rendered.as_str())), expected);
        }
    }
}

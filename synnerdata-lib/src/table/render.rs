//! pt-BR display formatting for cells

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::model::Value;

/// Text for `true`.
pub const YES: &str = "Sim";
/// Text for `false`.
pub const NO: &str = "Não";

/// Formats a boolean as `Sim` / `Não`.
pub fn yes_no(value: bool) -> &'static str {
    if value { YES } else { NO }
}

/// Formats an amount as Brazilian real: `R$ 1.234,56`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let mut abs = rounded.abs();
    abs.rescale(2);
    let text = abs.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{}", sign, group_thousands(int_part), frac_part)
}

/// Formats a point in time as `dd/mm/aaaa`.
pub fn format_date(value: NaiveDateTime) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// Formats a point in time as `dd/mm/aaaa HH:MM`.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Currency text for any numeric value; other values fall back to their text.
pub(crate) fn currency_cell(value: &Value) -> String {
    let amount = match value {
        Value::Decimal(d) => Some(*d),
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::from_f64_retain(*f),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    match amount {
        Some(amount) => format_currency(amount),
        None => value.to_text(),
    }
}

/// Date text for date-like values; other values fall back to their text.
pub(crate) fn date_cell(value: &Value, with_time: bool) -> String {
    match value.as_datetime() {
        Some(dt) if with_time => format_datetime(dt),
        Some(dt) => format_date(dt),
        None => value.to_text(),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(format_currency(Decimal::new(5, 1)), "R$ 0,50");
        assert_eq!(format_currency(Decimal::new(100000000, 0)), "R$ 100.000.000,00");
        assert_eq!(format_currency(Decimal::new(-1999, 2)), "-R$ 19,99");
        assert_eq!(format_currency(Decimal::new(-1, 3)), "R$ 0,00");
    }

    #[test]
    fn test_currency_cell_from_float() {
        assert_eq!(currency_cell(&Value::from(3500.5)), "R$ 3.500,50");
        assert_eq!(currency_cell(&Value::from("1200")), "R$ 1.200,00");
        assert_eq!(currency_cell(&Value::from("n/d")), "n/d");
    }

    #[test]
    fn test_dates() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(8, 7, 0)
            .unwrap();
        assert_eq!(format_date(dt), "05/01/2024");
        assert_eq!(format_datetime(dt), "05/01/2024 08:07");
        assert_eq!(date_cell(&Value::from("2023-12-31"), false), "31/12/2023");
        assert_eq!(date_cell(&Value::from("ontem"), false), "ontem");
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "Sim");
        assert_eq!(yes_no(false), "Não");
    }
}

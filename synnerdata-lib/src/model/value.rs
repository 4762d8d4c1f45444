//! Value enum for dynamic cell values

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// A dynamic value that can hold any field returned by the Synnerdata API.
///
/// This enum is what a [`Row`](super::Row) stores per field. Filters, search
/// and facets work on the text form from [`Value::to_text`], while sorting
/// and export look at the variant itself.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | boolean | `Bool` |
/// | integer number | `Int` |
/// | fractional number | `Float` |
/// | string | `String` |
/// | object, array | `Json` |
///
/// `Decimal`, `Date` and `DateTime` never come out of JSON decoding; they are
/// produced by typed callers (for example a salary or a computed accessor).
///
/// # Example
///
/// ```
/// use synnerdata_lib::model::Value;
///
/// let name = Value::from("Ana");
/// let salary = Value::from(3500.5);
/// let active = Value::from(true);
/// let empty = Value::Null;
/// assert_eq!(empty.to_text(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Arbitrary precision decimal (money).
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time with timezone.
    DateTime(DateTime<Utc>),
    /// Nested object or array, kept as JSON.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null values and empty strings.
    ///
    /// Facets skip these.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Json(serde_json::Value::Null) => true,
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Json(_) => "json",
        }
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Decimal(v) => v.to_f64(),
            _ => None,
        }
    }

    /// Interprets the value as a point in time.
    ///
    /// Dates map to midnight and date-times to UTC. Strings qualify only when
    /// they look like ISO 8601 (`2024-03-09`, `2024-03-09T10:00:00Z`) and
    /// parse as a real date.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => d.and_hms_opt(0, 0, 0),
            Value::DateTime(dt) => Some(dt.naive_utc()),
            Value::String(s) => parse_iso_datetime(s),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical text form used for matching.
    ///
    /// Null renders as the empty string, dates as ISO 8601 and nested JSON as
    /// compact JSON text.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Decimal(v) => v.normalize().to_string(),
            Value::String(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.to_rfc3339(),
            Value::Json(serde_json::Value::String(s)) => s.clone(),
            Value::Json(serde_json::Value::Null) => String::new(),
            Value::Json(json) => json.to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Returns `true` if the string starts with a `YYYY-MM-DD` shape.
///
/// Shape only; `2024-02-30` qualifies here and fails in [`Value::as_datetime`].
pub fn looks_like_iso_date(s: &str) -> bool {
    let b = s.trim().as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if !looks_like_iso_date(s) {
        return None;
    }
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Json(serde_json::Value::Number(n))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from(json!(3)), Value::Int(3));
        assert_eq!(Value::from(json!(2.5)), Value::Float(2.5));
    }

    #[test]
    fn test_nested_json_is_kept() {
        let value = Value::from(json!({"name": "RH"}));
        assert_eq!(value.type_name(), "json");
        assert_eq!(value.to_text(), r#"{"name":"RH"}"#);
    }

    #[test]
    fn test_blank_values() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from("A").is_blank());
        assert!(!Value::from(0i64).is_blank());
    }

    #[test]
    fn test_iso_strings_parse_as_dates() {
        let value = Value::from("2024-03-09");
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(value.as_datetime(), Some(expected));

        let value = Value::from("2024-03-09T12:30:00.000Z");
        assert_eq!(value.as_datetime().unwrap().format("%H:%M").to_string(), "12:30");

        assert_eq!(Value::from("2024-02-30").as_datetime(), None);
        assert_eq!(Value::from("Ana").as_datetime(), None);
        assert!(looks_like_iso_date("2024-02-30"));
    }

    #[test]
    fn test_text_forms() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::from(date).to_text(), "2024-03-09");
        assert_eq!(Value::from(3.0).to_text(), "3");
        assert_eq!(Value::from(Decimal::new(150, 2)).to_text(), "1.5");
    }
}

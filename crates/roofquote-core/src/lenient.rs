//! # Lenient Numeric Parsing
//!
//! Line items reach the engine from hand-edited forms, spreadsheet rows and
//! assistant tool calls. Their numeric fields may be numbers, numeric
//! strings (`"12.5"`, `"12.5 sq"`), empty strings or missing entirely.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON value            parsed as                                        │
//! │  ──────────            ─────────                                        │
//! │  12.5                  12.5                                             │
//! │  "12.5"                12.5                                             │
//! │  "  12.5 sq ft"        12.5   (longest leading decimal prefix)          │
//! │  "1e3"                 1000                                             │
//! │  "abc" / "" / null     0                                                │
//! │  true / {} / []        0                                                │
//! │  (missing)             0      (via #[serde(default)])                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed input never fails deserialization; it just contributes nothing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses the longest leading decimal number of `input`.
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with an
/// optional fraction, and an exponent only when digits follow it. Returns
/// `None` when no digits are found or the result is not finite.
///
/// ## Example
/// ```rust
/// use roofquote_core::lenient::parse_leading_number;
///
/// assert_eq!(parse_leading_number("32 squares"), Some(32.0));
/// assert_eq!(parse_leading_number("-.5"), Some(-0.5));
/// assert_eq!(parse_leading_number("2e"), Some(2.0));
/// assert_eq!(parse_leading_number("$40"), None);
/// ```
pub fn parse_leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Coerces any JSON value into a number, or `None` if it holds no number.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

/// Serde adapter: any value, falling back to `0.0`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

/// Serde adapter: any value, `None` when it holds no number.
pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("12.5"), Some(12.5));
        assert_eq!(parse_leading_number("  12.5 sq ft"), Some(12.5));
        assert_eq!(parse_leading_number("+7"), Some(7.0));
        assert_eq!(parse_leading_number("5."), Some(5.0));
        assert_eq!(parse_leading_number(".25"), Some(0.25));
        assert_eq!(parse_leading_number("1e3"), Some(1000.0));
        assert_eq!(parse_leading_number("1.5E-1x"), Some(0.15));
        assert_eq!(parse_leading_number("1,200"), Some(1.0));
    }

    #[test]
    fn test_parse_leading_number_rejects_non_numeric() {
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("1e999"), None);
    }

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(75)), Some(75.0));
        assert_eq!(number_from_value(&json!("75.50")), Some(75.5));
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!(true)), None);
        assert_eq!(number_from_value(&json!({"value": 1})), None);
        assert_eq!(number_from_value(&json!([1])), None);
    }
}

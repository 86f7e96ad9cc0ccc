//! Optional coercion of raw string cells into richer JSON values.

use serde_json::Value;

/// Cast a raw string field to null, bool, number or string.
///
/// The trimmed value is used for classification only; when nothing matches,
/// the original string is returned untouched (including surrounding
/// whitespace). A decimal comma is accepted as a decimal point, so `"1,99"`
/// casts to the float `1.99`.
pub fn cast_field(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        // Deliberately an empty string, not null: null cells only come from
        // row padding.
        return Value::String(String::new());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    let normalized = trimmed.replace(',', ".");
    if let Some(number) = parse_number(&normalized) {
        return number;
    }

    Value::String(raw.to_string())
}

/// Parse a normalized candidate into a JSON number.
///
/// A decimal point makes it a float, otherwise it is an integer. Exponent
/// forms and integers beyond the i64 range go through f64; integral results
/// that fit are still emitted as integers. Non-finite results are rejected so
/// the value falls back to a plain string.
fn parse_number(normalized: &str) -> Option<Value> {
    if normalized.contains('.') {
        let f: f64 = normalized.parse().ok()?;
        if !f.is_finite() {
            return None;
        }
        return serde_json::Number::from_f64(f).map(Value::Number);
    }

    if let Ok(n) = normalized.parse::<i64>() {
        return Some(Value::from(n));
    }

    let f: f64 = normalized.parse().ok()?;
    if !f.is_finite() {
        return None;
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        return Some(Value::from(f as i64));
    }
    serde_json::Number::from_f64(f).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cast_null_case_insensitive() {
        assert_eq!(cast_field("null"), Value::Null);
        assert_eq!(cast_field("NULL"), Value::Null);
        assert_eq!(cast_field("  Null "), Value::Null);
    }

    #[test]
    fn test_cast_booleans() {
        assert_eq!(cast_field("true"), json!(true));
        assert_eq!(cast_field("FALSE"), json!(false));
        assert_eq!(cast_field("True"), json!(true));
    }

    #[test]
    fn test_cast_integers() {
        assert_eq!(cast_field("42"), json!(42));
        assert_eq!(cast_field("-7"), json!(-7));
        assert_eq!(cast_field(" 007 "), json!(7));
    }

    #[test]
    fn test_cast_floats() {
        assert_eq!(cast_field("1.99"), json!(1.99));
        assert_eq!(cast_field("-0.5"), json!(-0.5));
    }

    #[test]
    fn test_cast_decimal_comma() {
        assert_eq!(cast_field("1,99"), json!(1.99));
        assert_eq!(cast_field("2,49"), json!(2.49));
    }

    #[test]
    fn test_cast_empty_is_empty_string_not_null() {
        assert_eq!(cast_field(""), json!(""));
        assert_eq!(cast_field("   "), json!(""));
    }

    #[test]
    fn test_cast_failure_keeps_original_untrimmed() {
        assert_eq!(cast_field("abc"), json!("abc"));
        assert_eq!(cast_field(" abc "), json!(" abc "));
        assert_eq!(cast_field("1.2.3"), json!("1.2.3"));
        assert_eq!(cast_field("12abc"), json!("12abc"));
    }

    #[test]
    fn test_cast_rejects_non_finite() {
        assert_eq!(cast_field("inf"), json!("inf"));
        assert_eq!(cast_field("NaN"), json!("NaN"));
    }

    #[test]
    fn test_cast_exponent_forms() {
        assert_eq!(cast_field("1e3"), json!(1000));
        assert_eq!(cast_field("2.5e1"), json!(25.0));
    }

    #[test]
    fn test_cast_huge_integer_becomes_float() {
        let value = cast_field("99999999999999999999");
        assert!(value.is_f64());
    }
}

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use validator::ValidationError;

/// 10^10, the first magnitude a NUMERIC(14, 4) column cannot hold
pub const NUMERIC_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Fractional digits kept by NUMERIC(14, 4) columns
pub const NUMERIC_SCALE: u32 = 4;

/// Rejects strings that are empty or whitespace only
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be empty".into()));
    }
    Ok(())
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative").with_message("must not be negative".into()));
    }
    Ok(())
}

/// Rejects amounts a NUMERIC(14, 4) column would overflow or silently round
pub fn storable_amount(value: &Decimal) -> Result<(), ValidationError> {
    if value.abs() >= NUMERIC_LIMIT {
        return Err(ValidationError::new("too_large")
            .with_message("must be less than 10000000000".into()));
    }
    if value.normalize().scale() > NUMERIC_SCALE {
        return Err(ValidationError::new("too_precise")
            .with_message("must have at most 4 decimal places".into()));
    }
    Ok(())
}

/// Integer id sent as a JSON number or a numeric string.
///
/// - Valid: `7`, `"7"`, `" 7 "`, `7.0`
/// - Invalid: `"7a"`, `7.5`, `true`, `null`
pub fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decimal sent as a JSON number or a numeric string.
///
/// - Valid: `4`, `2.5`, `"2.5"`, `"1e3"`
/// - Invalid: `"abc"`, `"NaN"`, `"Infinity"`, `[]`, `null`
pub fn lenient_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Non-blank string field, trimmed
pub fn lenient_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("road").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative(&Decimal::ZERO).is_ok());
        assert!(non_negative(&Decimal::new(125, 1)).is_ok());
        assert!(non_negative(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_storable_amount() {
        assert!(storable_amount(&Decimal::new(125, 1)).is_ok());
        assert!(storable_amount(&Decimal::new(12346, 4)).is_ok());
        // trailing zeros do not count as precision
        assert!(storable_amount(&Decimal::new(250000, 5)).is_ok());
        assert!(storable_amount(&Decimal::new(99_999_999_999_999, 4)).is_ok());

        assert!(storable_amount(&Decimal::new(123456, 5)).is_err());
        assert!(storable_amount(&Decimal::new(1, 5)).is_err());
        assert!(storable_amount(&NUMERIC_LIMIT).is_err());
        assert!(storable_amount(&Decimal::from(10_000_000_001_i64)).is_err());
    }

    #[test]
    fn test_lenient_i64_valid() {
        assert_eq!(lenient_i64(&json!(7)), Some(7));
        assert_eq!(lenient_i64(&json!("7")), Some(7));
        assert_eq!(lenient_i64(&json!(" 12 ")), Some(12));
        assert_eq!(lenient_i64(&json!(3.0)), Some(3));
    }

    #[test]
    fn test_lenient_i64_invalid() {
        assert_eq!(lenient_i64(&json!("7a")), None);
        assert_eq!(lenient_i64(&json!(7.5)), None);
        assert_eq!(lenient_i64(&json!("")), None);
        assert_eq!(lenient_i64(&json!(true)), None);
        assert_eq!(lenient_i64(&Value::Null), None);
    }

    #[test]
    fn test_lenient_decimal_valid() {
        assert_eq!(lenient_decimal(&json!(4)), Some(Decimal::from(4)));
        assert_eq!(lenient_decimal(&json!(2.5)), Some(Decimal::new(25, 1)));
        assert_eq!(lenient_decimal(&json!("2.5")), Some(Decimal::new(25, 1)));
        assert_eq!(lenient_decimal(&json!("1e3")), Some(Decimal::from(1000)));
    }

    #[test]
    fn test_lenient_decimal_invalid() {
        assert_eq!(lenient_decimal(&json!("abc")), None);
        assert_eq!(lenient_decimal(&json!("NaN")), None);
        assert_eq!(lenient_decimal(&json!("Infinity")), None);
        assert_eq!(lenient_decimal(&json!("  ")), None);
        assert_eq!(lenient_decimal(&json!([1])), None);
        assert_eq!(lenient_decimal(&Value::Null), None);
    }

    #[test]
    fn test_lenient_text() {
        assert_eq!(lenient_text(Some(&json!(" road "))), Some("road".to_string()));
        assert_eq!(lenient_text(Some(&json!(""))), None);
        assert_eq!(lenient_text(Some(&json!(5))), None);
        assert_eq!(lenient_text(None), None);
    }
}

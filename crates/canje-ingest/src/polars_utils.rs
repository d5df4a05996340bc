//! AnyValue helpers giving every cell a text view.

use polars::prelude::{AnyValue, DataFrame};

/// Converts AnyValue to a display string, formatting numbers without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Converts AnyValue to String, returning None for nulls.
pub fn any_to_opt_string(value: AnyValue<'_>) -> Option<String> {
    if matches!(value, AnyValue::Null) {
        None
    } else {
        Some(any_to_string(value))
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Returns true for null, empty, whitespace-only or `nan` cells.
pub fn is_blank_value(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
        }
    }
}

/// Returns the column names in field order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn numbers_lose_trailing_zeros() {
        assert_eq!(any_to_string(AnyValue::Float64(1.0)), "1");
        assert_eq!(any_to_string(AnyValue::Float64(200.50)), "200.5");
        assert_eq!(any_to_string(AnyValue::Int64(1200)), "1200");
        assert_eq!(format_numeric(100.0), "100");
    }

    #[test]
    fn blank_values() {
        assert!(is_blank_value(None));
        assert!(is_blank_value(Some("  ")));
        assert!(is_blank_value(Some("NaN")));
        assert!(!is_blank_value(Some("https://x/foto.jpg")));
    }

    #[test]
    fn null_has_no_text_view() {
        assert_eq!(any_to_opt_string(AnyValue::Null), None);
        assert_eq!(any_to_opt_string(AnyValue::String("")), Some(String::new()));
    }

    #[test]
    fn column_names_in_field_order() {
        let df = DataFrame::new(vec![
            Column::new("b".into(), vec!["1"]),
            Column::new("a".into(), vec!["2"]),
        ])
        .unwrap();
        assert_eq!(column_names(&df), vec!["b", "a"]);
    }
}

//! Numeric normalization utilities.

/// Converts locale-ambiguous numeric text into a finite value.
///
/// Everything except digits, `,`, `.` and `-` is stripped. When both
/// separators appear, the rightmost one is the decimal point and the other
/// one groups thousands. A lone comma is the decimal point. Returns None
/// when nothing parseable remains.
///
/// ```
/// use canje_transform::normalization::to_num;
///
/// assert_eq!(to_num("1.234,56"), Some(1234.56));
/// assert_eq!(to_num("1,234.56"), Some(1234.56));
/// assert_eq!(to_num("S/ 200,5"), Some(200.5));
/// assert_eq!(to_num("abc"), None);
/// ```
pub fn to_num(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, ',' | '.' | '-'))
        .collect();

    let canonical = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(period)) if comma > period => {
            cleaned.replace('.', "").replace(',', ".")
        }
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// [`to_num`] over an optional cell.
pub fn to_num_opt(value: Option<&str>) -> Option<f64> {
    value.and_then(to_num)
}

/// Parses a count with plain numeric coercion (no locale handling).
///
/// Integral floats such as `"2.0"` are accepted; fractional values are not
/// counts and yield None.
pub fn parse_count(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(count) = trimmed.parse::<i64>() {
        return Some(count);
    }
    let parsed = trimmed.parse::<f64>().ok()?;
    if parsed.is_finite() && parsed.fract() == 0.0 && parsed.abs() < 9.0e15 {
        Some(parsed as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_and_period() {
        assert_eq!(to_num("1.234,56"), Some(1234.56));
        assert_eq!(to_num("1.234.567,89"), Some(1234567.89));
        assert_eq!(to_num("1,234.56"), Some(1234.56));
    }

    #[test]
    fn single_separator() {
        assert_eq!(to_num("200,5"), Some(200.5));
        assert_eq!(to_num("200.5"), Some(200.5));
        assert_eq!(to_num("1,234"), Some(1.234));
        assert_eq!(to_num("250"), Some(250.0));
    }

    #[test]
    fn missing_values() {
        assert_eq!(to_num(""), None);
        assert_eq!(to_num("   "), None);
        assert_eq!(to_num("abc"), None);
        assert_eq!(to_num("nan"), None);
        assert_eq!(to_num("-"), None);
        assert_eq!(to_num("1.2.3"), None);
        assert_eq!(to_num_opt(None), None);
    }

    #[test]
    fn strips_currency_and_spaces() {
        assert_eq!(to_num(" S/ 150 "), Some(150.0));
        assert_eq!(to_num("-15,5"), Some(-15.5));
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("2"), Some(2));
        assert_eq!(parse_count(" 0 "), Some(0));
        assert_eq!(parse_count("2.0"), Some(2));
        assert_eq!(parse_count("1.5"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("dos"), None);
        assert_eq!(parse_count("1,0"), None);
    }
}

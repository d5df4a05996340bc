//! Day-first timestamp parsing.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 16] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 6] = [
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%y",
];

/// Parses a survey timestamp, reading ambiguous dates day-first.
///
/// Spanish meridiem markers (`a. m.`, `p. m.`) are accepted.
pub fn parse_day_first(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = normalize_meridiem(trimmed);

    for fmt in &DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(dt);
        }
    }
    for fmt in &DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&normalized, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Day of month of a survey timestamp; None when unparsable.
pub fn day_of_month(value: &str) -> Option<u32> {
    parse_day_first(value).map(|dt| dt.day())
}

fn normalize_meridiem(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut out = lower
        .replace("a. m.", "AM")
        .replace("p. m.", "PM")
        .replace("a.m.", "AM")
        .replace("p.m.", "PM");
    if out == lower {
        out = value.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_first_datetimes() {
        assert_eq!(day_of_month("05/01/2026 10:30:00"), Some(5));
        assert_eq!(day_of_month("15/01/2026 10:30"), Some(15));
        assert_eq!(day_of_month("15-01-2026"), Some(15));
        assert_eq!(day_of_month("15.01.2026 08:00"), Some(15));
    }

    #[test]
    fn iso_datetimes() {
        assert_eq!(day_of_month("2026-01-07 09:15:00"), Some(7));
        assert_eq!(day_of_month("2026-01-07T09:15:00.250"), Some(7));
        assert_eq!(day_of_month("2026-01-07"), Some(7));
    }

    #[test]
    fn spanish_meridiem() {
        let dt = parse_day_first("20/01/2026 03:45:00 p. m.").unwrap();
        assert_eq!(dt.day(), 20);
        assert_eq!(dt.format("%H:%M").to_string(), "15:45");
    }

    #[test]
    fn unparsable_is_missing() {
        assert_eq!(day_of_month(""), None);
        assert_eq!(day_of_month("ayer"), None);
        assert_eq!(day_of_month("32/01/2026"), None);
    }
}

//! Lenient text conversions. A value that does not parse yields the caller's
//! default instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

const DATE_TIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

pub fn to_bool(s: &str, default: bool) -> bool {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => default,
    }
}

pub fn to_int_with_negative(s: &str, default: i64) -> i64 {
    s.trim().parse().unwrap_or(default)
}

pub fn to_decimal_with_negative(s: &str, default: Decimal) -> Decimal {
    s.trim().parse().unwrap_or(default)
}

/// Accepts the layouts written by this module, RFC 3339 and the common
/// slash-separated layouts found in older archives.
pub fn to_date_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for layout in DATE_TIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_numbers_fall_back() {
        assert_eq!(to_int_with_negative("abc", 0), 0);
        assert_eq!(to_int_with_negative(" -42 ", 0), -42);
        assert_eq!(to_decimal_with_negative("1,5", Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            to_decimal_with_negative("-3.25", Decimal::ZERO),
            "-3.25".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn booleans_ignore_case() {
        assert!(to_bool("True", false));
        assert!(!to_bool("FALSE", true));
        assert!(!to_bool("yes", false));
    }

    #[test]
    fn dates_accept_legacy_layouts() {
        let expected = NaiveDate::from_ymd_opt(2019, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(to_date_time("2019-03-07 09:05:00"), Some(expected));
        assert_eq!(to_date_time("2019/3/7 9:05:00"), Some(expected));
        assert_eq!(to_date_time("2019-03-07T09:05:00"), Some(expected));
        assert!(to_date_time("yesterday").is_none());
        assert!(to_date_time("").is_none());
    }
}

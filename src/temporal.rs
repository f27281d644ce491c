//! Date and timestamp parsing for extract values
//!
//! HR extracts carry dates in several textual layouts. Parsing tries the
//! date-time layouts first, then date-only layouts (at midnight).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Accepted date-time layouts, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Accepted date layouts, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%y", "%d-%b-%Y", "%Y%m%d"];

/// Parse text into a timestamp
///
/// Date-only values land at midnight. Values with a UTC offset are
/// normalized to UTC.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| parse_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Parse text into a calendar date
///
/// Full timestamps are accepted and truncated to their date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test_case("2024-01-15 09:30:00", ts(2024, 1, 15, 9, 30, 0) ; "iso with space")]
    #[test_case("2024-01-15T09:30:00", ts(2024, 1, 15, 9, 30, 0) ; "iso with t")]
    #[test_case("2024-01-15T09:30:00Z", ts(2024, 1, 15, 9, 30, 0) ; "rfc3339")]
    #[test_case("2024-01-15", ts(2024, 1, 15, 0, 0, 0) ; "date only")]
    #[test_case("01/15/2024", ts(2024, 1, 15, 0, 0, 0) ; "us date")]
    #[test_case("17-Jun-03", ts(2003, 6, 17, 0, 0, 0) ; "oracle style")]
    fn test_parse_timestamp(input: &str, expected: NaiveDateTime) {
        assert_eq!(parse_timestamp(input), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn test_parse_date_truncates_time() {
        assert_eq!(
            parse_date("2024-01-15 09:30:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }
}

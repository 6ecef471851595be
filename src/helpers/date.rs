//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write;

/// Format an ISO 8601 date or datetime using a Moment.js-style format
///
/// Unparseable input is returned unchanged.
///
/// # Examples
/// ```ignore
/// format_iso_date("2024-01-05", "YYYY년 M월 D일") // -> "2024년 1월 5일"
/// ```
pub fn format_iso_date(iso: &str, format: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    let mut out = String::new();

    let written = if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        write!(out, "{}", dt.format(&chrono_format))
    } else if let Some(dt) = parse_naive(iso) {
        write!(out, "{}", dt.format(&chrono_format))
    } else {
        return iso.to_string();
    };

    // chrono reports specifiers it can't satisfy (e.g. %z on a bare date)
    match written {
        Ok(()) => out,
        Err(_) => iso.to_string(),
    }
}

fn parse_naive(iso: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest token first at every position
    const TOKENS: &[(&str, &str)] = &[
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("M", "%-m"),
        // Day of year / month
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("D", "%-d"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
        // Time
        ("HH", "%H"),
        ("H", "%-H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("SSS", "%3f"),
        ("A", "%p"),
        ("ZZ", "%z"),
    ];

    let mut result = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'outer: while !rest.is_empty() {
        for (from, to) in TOKENS {
            if let Some(stripped) = rest.strip_prefix(from) {
                result.push_str(to);
                rest = stripped;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                result.push_str("%%");
            } else {
                result.push(c);
            }
        }
        rest = chars.as_str();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_iso_date("2024-01-15", "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_iso_date("2024-01-15", "YYYY/MM/DD"), "2024/01/15");
        assert_eq!(format_iso_date("2024-01-05", "YYYY년 M월 D일"), "2024년 1월 5일");
        assert_eq!(format_iso_date("2024-01-15", "MMMM D, YYYY"), "January 15, 2024");
    }

    #[test]
    fn test_format_iso_datetime() {
        assert_eq!(
            format_iso_date("2024-01-15T09:30:00.000+09:00", "YYYY-MM-DD HH:mm"),
            "2024-01-15 09:30"
        );
        assert_eq!(
            format_iso_date("2024-01-15T09:30:00", "HH:mm:ss"),
            "09:30:00"
        );
    }

    #[test]
    fn test_format_unparseable_is_passthrough() {
        assert_eq!(format_iso_date("next week", "YYYY"), "next week");
        assert_eq!(format_iso_date("2024-01-15", "YYYY ZZ"), "2024-01-15");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("M/D 100%"), "%-m/%-d 100%%");
    }
}

//! Lenient date parsing shared by the metadata extractor and the
//! chronology resolver
//!
//! Every parser here is an ordered list of candidate formats returning the
//! first success; an unparsable date is `None`, never an error.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Parse a date string against the formats documentation actually uses.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim().trim_end_matches(['.', ',']);

    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y_%m_%d",
        "%m/%d/%Y",
        "%m-%d-%Y",
        "%m_%d_%Y",
        "%B %d, %Y",
        "%B %d %Y",
        "%b %d, %Y",
        "%d %B %Y",
    ];

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    // RFC 3339 timestamps appear in generated docs; take the date part
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    None
}

fn filename_date_regexes() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // YYYY-MM-DD / YYYY_MM_DD
            Regex::new(r"(\d{4})[-_](\d{2})[-_](\d{2})").unwrap(),
            // MM-DD-YYYY / MM_DD_YYYY
            Regex::new(r"(\d{2})[-_](\d{2})[-_](\d{4})").unwrap(),
            // Bare YYYYMMDD
            Regex::new(r"(?:^|[^\d])(\d{8})(?:[^\d]|$)").unwrap(),
        ]
    })
}

/// Extract a date embedded in a filename.
///
/// Supports `YYYY-MM-DD`, `YYYY_MM_DD`, `YYYYMMDD`, `MM-DD-YYYY`, and
/// `MM_DD_YYYY`. Year-first wins over month-first when both could match.
pub fn date_from_filename(filename: &str) -> Option<NaiveDate> {
    let regexes = filename_date_regexes();

    if let Some(caps) = regexes[0].captures(filename) {
        if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(date);
        }
    }

    if let Some(caps) = regexes[1].captures(filename) {
        if let Some(date) = ymd(&caps[3], &caps[1], &caps[2]) {
            return Some(date);
        }
    }

    if let Some(caps) = regexes[2].captures(filename) {
        let digits = &caps[1];
        if let Some(date) = ymd(&digits[0..4], &digits[4..6], &digits[6..8]) {
            return Some(date);
        }
    }

    None
}

fn content_date_regexes() -> &'static [Regex; 2] {
    static RES: OnceLock<[Regex; 2]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // Labeled dates: "Created: 2024-01-15", "**Date**: Jan 3, 2024"
            Regex::new(
                r"(?mi)^\s*(?:\*\*)?(?:created|date|completed|updated|last modified)(?:\*\*)?\s*:\s*(?:\*\*)?([A-Za-z0-9 ,/_-]+)",
            )
            .unwrap(),
            // Bare dates in prose: 2024-01-15, 01/15/2024, January 15, 2024
            Regex::new(
                r"\b(\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}|[A-Z][a-z]+ \d{1,2}, \d{4})\b",
            )
            .unwrap(),
        ]
    })
}

/// Find a date inside free text: labeled lines first, then bare dates.
pub fn date_from_content(text: &str) -> Option<NaiveDate> {
    let regexes = content_date_regexes();

    for caps in regexes[0].captures_iter(text) {
        if let Some(date) = parse_flexible_date(&caps[1]) {
            return Some(date);
        }
    }

    for caps in regexes[1].captures_iter(text) {
        if let Some(date) = parse_flexible_date(&caps[1]) {
            return Some(date);
        }
    }

    None
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    let y: i32 = y.parse().ok()?;
    let m: u32 = m.parse().ok()?;
    let d: u32 = d.parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_flexible_date("2024-01-15"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_parse_us_slash() {
        assert_eq!(parse_flexible_date("02/01/2024"), Some(date(2024, 2, 1)));
    }

    #[test]
    fn test_parse_month_name() {
        assert_eq!(
            parse_flexible_date("January 15, 2024"),
            Some(date(2024, 1, 15))
        );
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_flexible_date("next Tuesday"), None);
        assert_eq!(parse_flexible_date(""), None);
    }

    #[test]
    fn test_filename_iso_date() {
        assert_eq!(
            date_from_filename("RELEASE_2024-03-10_NOTES.md"),
            Some(date(2024, 3, 10))
        );
        assert_eq!(
            date_from_filename("report_2024_03_10.md"),
            Some(date(2024, 3, 10))
        );
    }

    #[test]
    fn test_filename_compact_date() {
        assert_eq!(
            date_from_filename("backup_20240310.md"),
            Some(date(2024, 3, 10))
        );
    }

    #[test]
    fn test_filename_month_first() {
        assert_eq!(
            date_from_filename("status_03-10-2024.md"),
            Some(date(2024, 3, 10))
        );
    }

    #[test]
    fn test_filename_invalid_date_rejected() {
        // 13th month parses as no date rather than a bogus one
        assert_eq!(date_from_filename("doc_2024-13-40.md"), None);
    }

    #[test]
    fn test_content_labeled_date_wins() {
        let text = "# Notes\n\nCreated: 2024-01-15\n\nShipped on 2024-06-01.\n";
        assert_eq!(date_from_content(text), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_content_bare_date_fallback() {
        let text = "# Notes\n\nWe shipped this on January 15, 2024 after review.\n";
        assert_eq!(date_from_content(text), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_content_no_date() {
        assert_eq!(date_from_content("# Notes\n\nNothing dated here.\n"), None);
    }
}

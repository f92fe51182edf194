//! Total coercion of raw spreadsheet cells onto the standard schema.
//!
//! Every helper is deterministic and never fails: malformed dates become
//! `None`, malformed numbers become zero, flags parse from free text.
//! Identity fields (preparer, approver) are taken verbatim by the
//! normalizer and never pass through here.

use chrono::NaiveDate;

/// Date layouts spreadsheet exports actually emit.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];

/// Parse a date cell. Empty or unrecognized input yields `None`.
///
/// Datetime cells keep their date part ("2024-01-31 00:00:00" and the ISO
/// "T" form both reduce to 2024-01-31).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let head = s.split(['T', ' ']).next().unwrap_or(s);
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(head, fmt) {
            return Some(date);
        }
    }
    None
}

/// Parse a monetary or numeric cell. Currency symbols, thousands
/// separators, and surrounding whitespace are ignored. Defaults to 0.0.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse().unwrap_or(0.0)
}

/// Parse an integer count cell. Defaults to 0. Spreadsheet exports often
/// render counts as floats ("3.0"), which truncate.
pub fn parse_count(raw: &str) -> i64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0;
    }
    if let Ok(n) = s.parse::<i64>() {
        return n;
    }
    s.parse::<f64>().map(|f| f as i64).unwrap_or(0)
}

/// Parse a yes/no cell from free text: case-insensitive membership in
/// {y, yes, true, 1} is true, any non-zero number is true, everything
/// else is false.
pub fn parse_flag(raw: &str) -> bool {
    let lower = raw.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return false;
    }
    if matches!(lower.as_str(), "y" | "yes" | "true" | "1") {
        return true;
    }
    if let Ok(n) = lower.parse::<f64>() {
        return n != 0.0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_iso() {
        assert_eq!(parse_date("2024-01-31"), Some(date(2024, 1, 31)));
    }

    #[test]
    fn date_alternate_layouts() {
        assert_eq!(parse_date("2024/01/31"), Some(date(2024, 1, 31)));
        assert_eq!(parse_date("01/31/2024"), Some(date(2024, 1, 31)));
        assert_eq!(parse_date("31-Jan-2024"), Some(date(2024, 1, 31)));
    }

    #[test]
    fn date_keeps_datetime_date_part() {
        assert_eq!(parse_date("2024-01-31 00:00:00"), Some(date(2024, 1, 31)));
        assert_eq!(parse_date("2024-01-31T12:30:00"), Some(date(2024, 1, 31)));
    }

    #[test]
    fn date_garbage_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("  "), None);
        assert_eq!(parse_date("n/a"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn amount_plain() {
        assert_eq!(parse_amount("100000"), 100000.0);
        assert_eq!(parse_amount("-500.25"), -500.25);
    }

    #[test]
    fn amount_formatted() {
        assert_eq!(parse_amount("$1,234.56"), 1234.56);
        assert_eq!(parse_amount(" 1 000 000 "), 1000000.0);
    }

    #[test]
    fn amount_garbage_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("pending"), 0.0);
    }

    #[test]
    fn count_variants() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count("3.0"), 3);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("many"), 0);
    }

    #[test]
    fn flag_truthy_text() {
        assert!(parse_flag("y"));
        assert!(parse_flag("Yes"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
    }

    #[test]
    fn flag_falsy_text() {
        assert!(!parse_flag("no"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("maybe"));
    }

    #[test]
    fn flag_numeric() {
        assert!(parse_flag("2"));
        assert!(parse_flag("-1"));
        assert!(parse_flag("0.5"));
        assert!(!parse_flag("0.0"));
    }
}

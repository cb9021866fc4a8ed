//! Display formatters shared by every rendered view
//!
//! Provides consistent rating and date display across cards, tables and the
//! detail page. One fixed date format is used everywhere (`dd/mm/yyyy`).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Number of glyphs in every star string
pub const STAR_COUNT: i64 = 5;

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

/// Fixed display format for dates
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date-only input formats, tried in order after RFC 3339
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Date-time input formats without offset
const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Render a rating as exactly five star glyphs
///
/// `n` is clamped to 0..=5.
///
/// # Examples
///
/// ```
/// use vitrine_common::format::star_glyphs;
///
/// assert_eq!(star_glyphs(3), "★★★☆☆");
/// assert_eq!(star_glyphs(-1), "☆☆☆☆☆");
/// assert_eq!(star_glyphs(9), "★★★★★");
/// ```
pub fn star_glyphs(n: i64) -> String {
    let filled = n.clamp(0, STAR_COUNT) as usize;
    let empty = STAR_COUNT as usize - filled;

    let mut out = String::with_capacity(STAR_COUNT as usize * FILLED_STAR.len_utf8());
    out.extend(std::iter::repeat(FILLED_STAR).take(filled));
    out.extend(std::iter::repeat(EMPTY_STAR).take(empty));
    out
}

/// Format a raw date string for display
///
/// Empty input yields an empty string. Parseable dates are shown as
/// `dd/mm/yyyy`; anything else is returned unchanged.
///
/// # Examples
///
/// ```
/// use vitrine_common::format::format_date;
///
/// assert_eq!(format_date("2024-01-15"), "15/01/2024");
/// assert_eq!(format_date("not-a-date"), "not-a-date");
/// assert_eq!(format_date(""), "");
/// ```
pub fn format_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    match parse_date(raw.trim()) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// Parse the calendar date of a raw date string
fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_glyphs_range() {
        assert_eq!(star_glyphs(0), "☆☆☆☆☆");
        assert_eq!(star_glyphs(1), "★☆☆☆☆");
        assert_eq!(star_glyphs(3), "★★★☆☆");
        assert_eq!(star_glyphs(5), "★★★★★");
    }

    #[test]
    fn test_star_glyphs_clamps() {
        assert_eq!(star_glyphs(-1), "☆☆☆☆☆");
        assert_eq!(star_glyphs(9), "★★★★★");
        assert_eq!(star_glyphs(i64::MIN), "☆☆☆☆☆");
        assert_eq!(star_glyphs(i64::MAX), "★★★★★");
    }

    #[test]
    fn test_star_glyphs_always_five() {
        for n in -3..10 {
            assert_eq!(star_glyphs(n).chars().count(), 5, "n = {}", n);
        }
    }

    #[test]
    fn test_format_date_iso_day() {
        assert_eq!(format_date("2024-01-15"), "15/01/2024");
        assert_eq!(format_date("2023/12/01"), "01/12/2023");
    }

    #[test]
    fn test_format_date_with_time() {
        assert_eq!(format_date("2024-03-02T10:30:00Z"), "02/03/2024");
        assert_eq!(format_date("2024-03-02T10:30"), "02/03/2024");
        assert_eq!(format_date("2024-03-02T23:30:00-03:00"), "02/03/2024");
    }

    #[test]
    fn test_format_date_passthrough() {
        assert_eq!(format_date("not-a-date"), "not-a-date");
        assert_eq!(format_date("2024-13-45"), "2024-13-45");
        assert_eq!(format_date("semana passada"), "semana passada");
    }

    #[test]
    fn test_format_date_empty() {
        assert_eq!(format_date(""), "");
    }
}

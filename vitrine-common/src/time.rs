//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as Unix epoch milliseconds (the `_ts` unit)
pub fn now_millis() -> i64 {
    now().timestamp_millis()
}

/// UTC timestamp rendered as RFC 3339 with second precision
///
/// Used for the manifest's `generated_at` field.
pub fn iso_now_seconds() -> String {
    now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_recent() {
        let ms = now_millis();
        assert!(ms > 946_684_800_000); // 2000-01-01 00:00:00 UTC
        assert!(ms < 4_102_444_800_000); // 2100-01-01 00:00:00 UTC
    }

    #[test]
    fn test_now_millis_successive_calls_do_not_go_back() {
        let first = now_millis();
        let second = now_millis();
        assert!(second >= first);
    }

    #[test]
    fn test_iso_now_seconds_has_no_fraction() {
        let s = iso_now_seconds();
        assert!(s.ends_with("+00:00"), "expected UTC offset in {}", s);
        assert!(!s.contains('.'), "expected second precision in {}", s);
        assert!(chrono::DateTime::parse_from_rfc3339(&s).is_ok());
    }
}

//! Lenient numeric prefix parsing for hand-edited documents
//!
//! Documents are typed by hand, so values like `"12.5g"` or `" 93 °C"` are
//! common. These parsers read the longest leading decimal literal and ignore
//! the rest, the same way a browser's `parseFloat`/`parseInt` would.

/// Parse the leading decimal float literal of `s`
///
/// Leading whitespace is skipped. Returns `None` when no digits are found or
/// the result is not finite.
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse the leading base-10 integer literal of `s`
///
/// Leading whitespace is skipped, an optional sign is accepted, and parsing
/// stops at the first non-digit. Values outside `i64` yield `None`.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_plain_values() {
        assert_eq!(parse_float("12.5"), Some(12.5));
        assert_eq!(parse_float("-3"), Some(-3.0));
        assert_eq!(parse_float("+4"), Some(4.0));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("5."), Some(5.0));
    }

    #[test]
    fn test_parse_float_reads_prefix_only() {
        assert_eq!(parse_float("12.5g"), Some(12.5));
        assert_eq!(parse_float("  93 °C"), Some(93.0));
        assert_eq!(parse_float("12,5"), Some(12.0));
        assert_eq!(parse_float("-3.2e2x"), Some(-320.0));
        assert_eq!(parse_float("1e"), Some(1.0));
        assert_eq!(parse_float("1e+"), Some(1.0));
    }

    #[test]
    fn test_parse_float_rejects_non_numbers() {
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("-"), None);
        assert_eq!(parse_float("Infinity"), None);
        assert_eq!(parse_float("1e999"), None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int("12"), Some(12));
        assert_eq!(parse_int("12.7"), Some(12));
        assert_eq!(parse_int("  -7 screens"), Some(-7));
        assert_eq!(parse_int("0x1A"), Some(0));
        assert_eq!(parse_int("x12"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("+"), None);
    }

    #[test]
    fn test_parse_int_overflow() {
        assert_eq!(parse_int("99999999999999999999999"), None);
    }
}

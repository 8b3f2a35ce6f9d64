//! Column classification and numeric coercion of raw cell text.

use crate::dataset::Row;

/// Whole-string numeric coercion. Surrounding whitespace is ignored;
/// `0x`/`0o`/`0b` integer literals are accepted. Returns `None` for blank
/// text, unparsable text and non-finite results.
pub fn coerce_number(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }

    let radix = match t.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    let value = match radix {
        Some(radix) => u64::from_str_radix(&t[2..], radix).ok().map(|v| v as f64),
        None => t.parse::<f64>().ok(),
    };
    value.filter(|v| v.is_finite())
}

/// Leading-prefix float parse: "12px" is 12, "  -3.5e2x" is -350, "abc" is
/// `None`. Non-finite results are `None`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let t = text.trim_start();
    let bytes = t.as_bytes();
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
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
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

    t[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// True when the cell holds a non-blank value that coerces to a finite number.
pub fn is_numeric_text(text: &str) -> bool {
    coerce_number(text).is_some()
}

/// Headers (in header order) for which at least one row has a numeric value.
pub fn numeric_headers(rows: &[Row], headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .filter(|header| {
            rows.iter()
                .any(|row| row.get(header).is_some_and(is_numeric_text))
        })
        .cloned()
        .collect()
}

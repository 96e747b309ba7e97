//! Whole-string numeric parsing (`Number(str)` followed by `new Date(n)`).

use crate::time::{DateTimeFixed, MAX_EPOCH_MILLIS, from_epoch_millis};
use crate::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;

static DECIMAL_RE: OnceLock<Regex> = OnceLock::new();

/// Parses `s` as a number the way JavaScript's `Number()` does, minus the empty-string quirk.
///
/// Returns `None` when `s` is not numeric at all. `Infinity` and `NaN` are rejected since no date
/// can come from them anyway.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            // `from_str_radix` tolerates a leading sign; `Number()` does not.
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
        }
    }

    let re = DECIMAL_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("decimal regex must compile")
    });
    if !re.is_match(s) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Applies JavaScript's TimeClip: finite, within ±8.64e15, truncated toward zero.
pub fn time_clip(value: f64) -> Option<i64> {
    if !value.is_finite() || value.abs() > MAX_EPOCH_MILLIS as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

/// Parses a numeric string as epoch milliseconds.
///
/// `Ok(None)` means the input is not a number; `Err` means it is a number but no valid instant.
pub fn parse_epoch_millis(s: &str) -> Result<Option<DateTimeFixed>> {
    let Some(value) = parse_number(s) else {
        return Ok(None);
    };
    let dt = time_clip(value)
        .and_then(from_epoch_millis)
        .ok_or(Error::OutOfRange { millis: value })?;
    Ok(Some(dt))
}

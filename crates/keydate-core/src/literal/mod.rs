//! Date/time literal parsing with JavaScript `Date` string semantics.
//!
//! Tuple keys carry whatever a data source happened to print, so the accepted shapes mirror what a
//! browser's `new Date(str)` accepts for the formats that show up in practice:
//! - ISO-ish `YYYY-MM-DD[ T]HH:mm[:ss[.fff]][Z|±HH:MM]` (date-only ISO is UTC, the rest local)
//! - V8's `MM-DD-YY-HH:mm` heuristic
//! - RFC 3339
//! - the legacy token form: `Nov 04, 2019 3:15:00 PM`, `2003.5`, `11/04/2019`, `Date#toString`

mod iso;
mod legacy;

use crate::time::{DateTimeFixed, LocalZone, in_js_range};
use crate::{Error, Result};
use chrono::{Days, NaiveDate};

/// Parses a date literal, resolving offset-less forms through `zone`.
pub fn parse_date_literal(s: &str, zone: LocalZone) -> Result<DateTimeFixed> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::invalid_date(s));
    }

    let parsed = iso::parse_iso_year_month(s)
        .or_else(|| iso::parse_ymd_datetime(s, zone))
        .or_else(|| iso::parse_mdy_hm_datetime(s, zone))
        .or_else(|| chrono::DateTime::parse_from_rfc3339(s).ok())
        .or_else(|| legacy::parse_legacy(s, zone));

    parsed
        .and_then(in_js_range)
        .ok_or_else(|| Error::invalid_date(s))
}

fn parse_u32(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Splits off a leading run of at most `max` ASCII digits.
fn split_digits(s: &str, max: usize) -> (&str, &str) {
    let n = s.bytes().take(max).take_while(u8::is_ascii_digit).count();
    s.split_at(n)
}

/// Builds a calendar date the way `Date` does: a day past the end of its month rolls over into the
/// next one (`2019-02-31` is March 3rd). Days outside `1..=31` are rejected.
fn rolling_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
}

/// JavaScript two-digit year window: 00–49 => 2000–2049, 50–99 => 1950–1999.
fn expand_two_digit_year(year: i32) -> i32 {
    match year {
        0..=49 => 2000 + year,
        50..=99 => 1900 + year,
        _ => year,
    }
}

/// Reads a fractional-seconds digit run as milliseconds (`5` => 500, `25` => 250, `1234` => 123).
fn fraction_to_millis(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }
    let head: String = digits.chars().take(3).collect();
    let value = parse_u32(&head)?;
    Some(match head.len() {
        1 => value * 100,
        2 => value * 10,
        _ => value,
    })
}

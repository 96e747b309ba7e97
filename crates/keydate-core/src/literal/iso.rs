use super::{expand_two_digit_year, fraction_to_millis, parse_u32, rolling_date, split_digits};
use crate::time::{DateTimeFixed, LocalZone, utc};
use chrono::{FixedOffset, NaiveDate, TimeZone};
use regex::Regex;
use std::sync::OnceLock;

static ISO_YEAR_MONTH_RE: OnceLock<Regex> = OnceLock::new();

/// `YYYY` and `YYYY-MM` are ISO date-only forms, which JavaScript reads as UTC.
pub(super) fn parse_iso_year_month(s: &str) -> Option<DateTimeFixed> {
    let re = ISO_YEAR_MONTH_RE.get_or_init(|| {
        Regex::new(r"^(?<year>[0-9]{4})(?:-(?<month>[0-9]{2}))?$")
            .expect("iso year-month regex must compile")
    });
    let caps = re.captures(s)?;
    let year: i32 = caps.name("year")?.as_str().parse().ok()?;
    let month = match caps.name("month") {
        Some(m) => parse_u32(m.as_str())?,
        None => 1,
    };
    let naive = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    Some(utc().from_utc_datetime(&naive))
}

fn split_once(s: &str, ch: char) -> Option<(&str, &str)> {
    let idx = s.find(ch)?;
    Some((&s[..idx], &s[idx + 1..]))
}

fn parse_timezone_offset_minutes(s: &str) -> Option<(i32, &str)> {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('Z') {
        return Some((0, rest));
    }
    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1i32, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1i32, rest)
    } else {
        return None;
    };

    let (hh_str, rest) = split_digits(rest, 2);
    let hh = parse_u32(hh_str)? as i32;
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let (mm_str, rest) = split_digits(rest, 2);
    let mm = parse_u32(mm_str)? as i32;

    if hh > 23 || mm > 59 {
        return None;
    }
    Some((sign * (hh * 60 + mm), rest))
}

/// `Y-M-D` / `Y/M/D` with an optional `[T| ]HH:mm[:ss[.fff]]` time and offset.
pub(super) fn parse_ymd_datetime(s: &str, zone: LocalZone) -> Option<DateTimeFixed> {
    // Date-only ISO 8601 (`YYYY-MM-DD`) is UTC in JavaScript. Non-ISO variants such as
    // `2019-09-1` or `2019/09/01` are local time in V8.
    fn date_only_is_iso_utc(sep: char, year: &str, month: &str, day: &str) -> bool {
        sep == '-' && year.len() == 4 && month.len() == 2 && day.len() == 2
    }

    let end = s
        .char_indices()
        .find(|&(_, c)| c == 'T' || c.is_whitespace())
        .map_or(s.len(), |(i, _)| i);
    let (date_part, rest) = s.split_at(end);

    let sep = if date_part.contains('-') {
        '-'
    } else if date_part.contains('/') {
        '/'
    } else {
        return None;
    };

    let (year_str, rest1) = split_once(date_part, sep)?;
    let (month_str, day_str) = split_once(rest1, sep)?;
    // Shorter leading fields are month-first (`11/04/2019`) and belong to the legacy parser.
    if !(3..=4).contains(&year_str.len()) || !year_str.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year_str.parse().ok()?;
    let month = parse_u32(month_str)?;
    let day = parse_u32(day_str)?;
    let date = rolling_date(year, month, day)?;

    let rest = rest.trim_start();
    if rest.is_empty() {
        let naive = date.and_hms_opt(0, 0, 0)?;
        if date_only_is_iso_utc(sep, year_str, month_str, day_str) {
            return Some(utc().from_utc_datetime(&naive));
        }
        return Some(zone.from_naive_local(naive));
    }

    let rest = rest.strip_prefix('T').unwrap_or(rest).trim_start();

    let (hh_str, rest) = split_once(rest, ':')?;
    let hour = parse_u32(hh_str)?;
    let (mm_str, mut rest) = split_digits(rest, 2);
    let minute = parse_u32(mm_str)?;

    let mut second = 0;
    let mut millis = 0;
    if let Some(r) = rest.strip_prefix(':') {
        let (ss_str, r) = split_digits(r, 2);
        second = parse_u32(ss_str)?;
        rest = r;

        if let Some(r) = rest.strip_prefix('.') {
            let (frac, r) = split_digits(r, usize::MAX);
            millis = fraction_to_millis(frac)?;
            rest = r;
        }
    }

    let mut offset_minutes = None;
    let rest = rest.trim_start();
    if !rest.is_empty() {
        let (mins, tail) = parse_timezone_offset_minutes(rest)?;
        if !tail.trim().is_empty() {
            return None;
        }
        offset_minutes = Some(mins);
    }

    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    let naive = date.and_hms_milli_opt(hour, minute, second, millis)?;

    match offset_minutes {
        Some(mins) => FixedOffset::east_opt(mins * 60)?
            .from_local_datetime(&naive)
            .single(),
        None => Some(zone.from_naive_local(naive)),
    }
}

/// V8 reads strings like `08-08-09-01:00` as local time using an `MM-DD-YY-HH:mm` heuristic.
pub(super) fn parse_mdy_hm_datetime(s: &str, zone: LocalZone) -> Option<DateTimeFixed> {
    let mut parts = s.splitn(4, '-');
    let month_str = parts.next()?;
    let day_str = parts.next()?;
    let year_str = parts.next()?;
    let time_str = parts.next()?;

    let month = parse_u32(month_str)?;
    let day = parse_u32(day_str)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let year_raw = parse_u32(year_str)? as i32;
    let year = match year_str.len() {
        2 => expand_two_digit_year(year_raw),
        4 => year_raw,
        _ => return None,
    };

    let (hour_str, rest) = time_str.split_once(':')?;
    let (minute_str, rest) = split_digits(rest, 2);
    let hour = parse_u32(hour_str)?;
    let minute = parse_u32(minute_str)?;
    if hour > 23 || minute > 59 {
        return None;
    }

    let (second, millis) = match rest.strip_prefix(':') {
        Some(rest) => {
            let (second_str, rest) = split_digits(rest, 2);
            let second = parse_u32(second_str)?;
            if second > 59 {
                return None;
            }
            let millis = match rest.strip_prefix('.') {
                Some(frac) => fraction_to_millis(frac)?,
                None if rest.is_empty() => 0,
                None => return None,
            };
            (second, millis)
        }
        None if rest.is_empty() => (0, 0),
        None => return None,
    };

    let date = rolling_date(year, month, day)?;
    let naive = date.and_hms_milli_opt(hour, minute, second, millis)?;
    Some(zone.from_naive_local(naive))
}

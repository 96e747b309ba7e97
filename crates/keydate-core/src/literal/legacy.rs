use super::{expand_two_digit_year, fraction_to_millis, parse_u32, rolling_date, split_digits};
use crate::time::{DateTimeFixed, LocalZone};
use chrono::{FixedOffset, TimeZone};

#[derive(Debug, Clone, Copy)]
struct Number {
    value: u32,
    digits: usize,
}

impl Number {
    fn is_year_like(self) -> bool {
        self.digits > 2 || self.value > 31
    }

    fn as_year(self) -> i32 {
        let value = self.value as i32;
        if self.digits <= 2 {
            expand_two_digit_year(value)
        } else {
            value
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Clock {
    hour: u32,
    minute: u32,
    second: u32,
    millis: u32,
}

#[derive(Debug, Default)]
struct LegacyParts {
    numbers: Vec<Number>,
    month: Option<u32>,
    clock: Option<Clock>,
    is_pm: Option<bool>,
    offset_minutes: Option<i32>,
}

impl LegacyParts {
    fn is_empty(&self) -> bool {
        self.numbers.is_empty() && self.month.is_none() && self.clock.is_none()
    }
}

enum Word {
    Month(u32),
    Weekday,
    Meridiem { pm: bool },
    Utc,
}

fn classify_word(word: &str) -> Option<Word> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    const DAYS: [&str; 7] = [
        "sunday",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
    ];

    let lower = word.to_ascii_lowercase();
    match lower.as_str() {
        "am" => return Some(Word::Meridiem { pm: false }),
        "pm" => return Some(Word::Meridiem { pm: true }),
        "gmt" | "utc" | "ut" | "z" => return Some(Word::Utc),
        "sept" => return Some(Word::Month(9)),
        _ => {}
    }
    for (i, name) in MONTHS.iter().enumerate() {
        if lower == *name || lower == name[..3] {
            return Some(Word::Month(i as u32 + 1));
        }
    }
    if DAYS.iter().any(|name| lower == *name || lower == name[..3]) {
        return Some(Word::Weekday);
    }
    None
}

/// Reads `h:mm[:ss[.fff]]`, with the hour digits already consumed.
fn scan_clock(hour: &str, rest: &str) -> Option<(Clock, usize)> {
    let hour = parse_u32(hour)?;
    let after_colon = rest.strip_prefix(':')?;
    let (minute, mut tail) = split_digits(after_colon, 2);
    let minute = parse_u32(minute)?;

    let mut second = 0;
    let mut millis = 0;
    if let Some(r) = tail.strip_prefix(':') {
        let (ss, r) = split_digits(r, 2);
        second = parse_u32(ss)?;
        tail = r;
        if let Some(r) = tail.strip_prefix('.') {
            let (frac, r) = split_digits(r, usize::MAX);
            millis = fraction_to_millis(frac)?;
            tail = r;
        }
    }

    let clock = Clock {
        hour,
        minute,
        second,
        millis,
    };
    Some((clock, rest.len() - tail.len()))
}

/// Reads the digits of a `±HH[:]MM` / `±H` offset, returning signed minutes.
fn scan_offset(sign: i32, rest: &str) -> Option<(i32, usize)> {
    let (digits, tail) = split_digits(rest, 4);
    let (hours, minutes, tail) = match digits.len() {
        1 | 2 => match tail.strip_prefix(':') {
            Some(r) => {
                let (mm, r) = split_digits(r, 2);
                (parse_u32(digits)?, parse_u32(mm)?, r)
            }
            None => (parse_u32(digits)?, 0, tail),
        },
        4 => (parse_u32(&digits[..2])?, parse_u32(&digits[2..])?, tail),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let total = sign * (hours as i32 * 60 + minutes as i32);
    Some((total, rest.len() - tail.len()))
}

fn scan(s: &str) -> Option<LegacyParts> {
    let mut parts = LegacyParts::default();
    let mut expect_offset = false;
    let mut i = 0usize;

    while i < s.len() {
        let rest = &s[i..];
        let c = rest.chars().next()?;

        match c {
            ' ' | '\t' | ',' | '/' | '.' => i += 1,
            '(' => {
                // Only a trailing `(Zone Name)` comment, as printed by `Date#toString`.
                if parts.is_empty() {
                    return None;
                }
                let close = rest.find(')')?;
                if !rest[close + 1..].trim().is_empty() {
                    return None;
                }
                break;
            }
            '+' | '-' => {
                let sign = if c == '+' { 1 } else { -1 };
                let digits_follow = rest[1..].starts_with(|ch: char| ch.is_ascii_digit());
                let offset_position = expect_offset || parts.clock.is_some();
                if digits_follow && offset_position {
                    if parts.offset_minutes.is_some() && !expect_offset {
                        return None;
                    }
                    let (mins, used) = scan_offset(sign, &rest[1..])?;
                    parts.offset_minutes = Some(mins);
                    expect_offset = false;
                    i += 1 + used;
                } else {
                    i += 1;
                }
            }
            '0'..='9' => {
                let (digits, tail) = split_digits(rest, usize::MAX);
                if tail.starts_with(':') {
                    if parts.clock.is_some() || digits.len() > 2 {
                        return None;
                    }
                    let (clock, used) = scan_clock(digits, tail)?;
                    parts.clock = Some(clock);
                    i += digits.len() + used;
                } else {
                    if digits.len() > 6 {
                        return None;
                    }
                    parts.numbers.push(Number {
                        value: parse_u32(digits)?,
                        digits: digits.len(),
                    });
                    i += digits.len();
                }
            }
            c if c.is_ascii_alphabetic() => {
                let len = rest
                    .bytes()
                    .take_while(|b| b.is_ascii_alphabetic())
                    .count();
                match classify_word(&rest[..len])? {
                    Word::Month(m) => {
                        if parts.month.replace(m).is_some() {
                            return None;
                        }
                    }
                    Word::Weekday => {}
                    Word::Meridiem { pm } => {
                        if parts.clock.is_none() || parts.is_pm.replace(pm).is_some() {
                            return None;
                        }
                    }
                    Word::Utc => {
                        if parts.offset_minutes.replace(0).is_some() {
                            return None;
                        }
                        expect_offset = true;
                    }
                }
                i += len;
            }
            _ => return None,
        }
    }

    Some(parts)
}

fn compose(parts: &LegacyParts, zone: LocalZone) -> Option<DateTimeFixed> {
    let (year, month, day) = match parts.month {
        Some(month) => match parts.numbers.as_slice() {
            // `Nov 2019`: month-level keys default to the 1st.
            [year] if year.is_year_like() => (year.as_year(), month, 1),
            [a, b] => {
                let (day, year) = if a.is_year_like() && !b.is_year_like() {
                    (b, a)
                } else {
                    (a, b)
                };
                (year.as_year(), month, day.value)
            }
            _ => return None,
        },
        None => match parts.numbers.as_slice() {
            [y, rest @ ..] if y.digits > 2 && (1..=2).contains(&rest.len()) => {
                let month = rest[0].value;
                let day = rest.get(1).map_or(1, |d| d.value);
                (y.as_year(), month, day)
            }
            [m, d, y] => (y.as_year(), m.value, d.value),
            _ => return None,
        },
    };

    let date = rolling_date(year, month, day)?;

    let clock = parts.clock.unwrap_or(Clock {
        hour: 0,
        minute: 0,
        second: 0,
        millis: 0,
    });
    let hour = match parts.is_pm {
        Some(pm) => {
            if !(1..=12).contains(&clock.hour) {
                return None;
            }
            clock.hour % 12 + if pm { 12 } else { 0 }
        }
        None => clock.hour,
    };
    if hour > 23 || clock.minute > 59 || clock.second > 59 {
        return None;
    }
    let naive = date.and_hms_milli_opt(hour, clock.minute, clock.second, clock.millis)?;

    match parts.offset_minutes {
        Some(mins) => FixedOffset::east_opt(mins * 60)?
            .from_local_datetime(&naive)
            .single(),
        None => Some(zone.from_naive_local(naive)),
    }
}

/// Parses the free-form token shapes V8's legacy date parser accepts.
pub(super) fn parse_legacy(s: &str, zone: LocalZone) -> Option<DateTimeFixed> {
    let parts = scan(s)?;
    compose(&parts, zone)
}

//! dayjs-style label formatting for extracted instants.
//!
//! A pattern is read as runs of one repeated letter (`YYYY`, `MMM`, `h`). Each run maps onto a
//! chrono strftime specifier where one exists; `[...]` copies its contents verbatim and any other
//! character is literal.

use crate::time::{DateTimeFixed, LocalZone};
use chrono::Datelike;

/// Longest field any letter supports (`YYYY`, `MMMM`, `dddd`).
const MAX_FIELD_WIDTH: usize = 4;

fn strftime_spec(letter: char, width: usize) -> Option<&'static str> {
    let spec = match (letter, width) {
        ('Y', 4) => "%Y",
        ('Y', 2) => "%y",
        ('M', 4) => "%B",
        ('M', 3) => "%b",
        ('M', 2) => "%m",
        ('M', 1) => "%-m",
        ('D', 2) => "%d",
        ('D', 1) => "%-d",
        ('d', 4) => "%A",
        ('d', 3) => "%a",
        ('H', 2) => "%H",
        ('H', 1) => "%-H",
        ('h', 2) => "%I",
        ('h', 1) => "%-I",
        ('m', 2) => "%M",
        ('m', 1) => "%-M",
        ('s', 2) => "%S",
        ('s', 1) => "%-S",
        ('S', 3) => "%3f",
        ('Z', 2) => "%z",
        ('Z', 1) => "%:z",
        ('A', 1) => "%p",
        ('a', 1) => "%P",
        _ => return None,
    };
    Some(spec)
}

fn render_field(
    letter: char,
    width: usize,
    instant: DateTimeFixed,
    local: DateTimeFixed,
) -> Option<String> {
    if let Some(spec) = strftime_spec(letter, width) {
        return Some(local.format(spec).to_string());
    }
    let millis = local.timestamp_subsec_millis().min(999);
    match (letter, width) {
        ('S', 2) => Some(format!("{:02}", millis / 10)),
        ('S', 1) => Some((millis / 100).to_string()),
        ('x', 1) => Some(instant.timestamp_millis().to_string()),
        ('X', 1) => Some(instant.timestamp_millis().div_euclid(1000).to_string()),
        _ => None,
    }
}

fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Renders `instant` in `zone` using dayjs format tokens.
pub fn format_label(instant: DateTimeFixed, pattern: &str, zone: LocalZone) -> String {
    let local = zone.to_local(instant);
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(close) = rest[1..].find(']') {
                out.push_str(&rest[1..=close]);
                rest = &rest[close + 2..];
                continue;
            }
        }
        if let Some(tail) = rest.strip_prefix("Do") {
            let day = local.day();
            out.push_str(&day.to_string());
            out.push_str(ordinal_suffix(day));
            rest = tail;
            continue;
        }

        // Widest supported field first: `YYY` is `YY` followed by a literal `Y`.
        let run = rest.chars().take_while(|&c| c == ch).count().min(MAX_FIELD_WIDTH);
        let field = (1..=run)
            .rev()
            .find_map(|width| render_field(ch, width, instant, local).map(|text| (width, text)));
        let consumed = match field {
            Some((width, text)) => {
                out.push_str(&text);
                width
            }
            None => {
                out.push(ch);
                1
            }
        };
        rest = &rest[consumed * ch.len_utf8()..];
    }
    out
}

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone};

pub(crate) type DateTimeFixed = DateTime<FixedOffset>;

/// Upper bound (inclusive) of a valid JavaScript `Date`, in milliseconds from the epoch.
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

/// The timezone used to interpret date literals that carry no explicit offset.
///
/// Tuple keys follow JavaScript local-time semantics: `2018-02-18 19:00:00` means 19:00 wherever
/// the chart is rendered. `System` uses the host timezone; `Fixed` pins an offset (minutes east
/// of UTC) so results are reproducible across machines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocalZone {
    #[default]
    System,
    Fixed(i32),
}

impl LocalZone {
    /// Builds a fixed zone, rejecting offsets a `FixedOffset` cannot represent.
    pub fn fixed_minutes(offset_minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
        Some(Self::Fixed(offset_minutes))
    }

    fn fixed_offset(minutes: i32) -> FixedOffset {
        FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(utc)
    }

    /// Interprets a local `NaiveDateTime` as an absolute instant in this zone.
    pub fn from_naive_local(self, naive: NaiveDateTime) -> DateTimeFixed {
        match self {
            LocalZone::Fixed(mins) => {
                let offset = Self::fixed_offset(mins);
                offset
                    .from_local_datetime(&naive)
                    .single()
                    .unwrap_or_else(|| DateTime::from_naive_utc_and_offset(naive, offset))
            }
            LocalZone::System => match chrono::Local.from_local_datetime(&naive) {
                chrono::LocalResult::Single(dt) => dt.fixed_offset(),
                chrono::LocalResult::Ambiguous(a, _b) => a.fixed_offset(),
                chrono::LocalResult::None => DateTime::from_naive_utc_and_offset(naive, utc()),
            },
        }
    }

    /// Maps an absolute instant into this zone.
    pub fn to_local(self, dt: DateTimeFixed) -> DateTimeFixed {
        match self {
            LocalZone::Fixed(mins) => dt.with_timezone(&Self::fixed_offset(mins)),
            LocalZone::System => dt.with_timezone(&chrono::Local).fixed_offset(),
        }
    }
}

pub(crate) fn utc() -> FixedOffset {
    chrono::Utc.fix()
}

/// Builds an instant from epoch milliseconds, enforcing the JavaScript `Date` range.
///
/// chrono stops short of the far ends of that range (year ±262142), so the extremes also yield
/// `None`.
pub(crate) fn from_epoch_millis(ms: i64) -> Option<DateTimeFixed> {
    if !(-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS).contains(&ms) {
        return None;
    }
    let dt = DateTime::<chrono::Utc>::from_timestamp_millis(ms)?;
    Some(dt.with_timezone(&utc()))
}

/// Rejects instants outside the JavaScript `Date` range.
pub(crate) fn in_js_range(dt: DateTimeFixed) -> Option<DateTimeFixed> {
    let ms = dt.timestamp_millis();
    (-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS)
        .contains(&ms)
        .then_some(dt)
}

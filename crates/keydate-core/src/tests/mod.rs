mod golden;

use crate::*;
use std::sync::Arc;

/// An extractor pinned to UTC local time, plus the sink it reports into.
fn utc_extractor() -> (Extractor, Arc<CollectingSink>) {
    extractor_at(0)
}

fn extractor_at(offset_minutes: i32) -> (Extractor, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::new());
    let extractor = Extractor::new()
        .with_fixed_local_offset_minutes(Some(offset_minutes))
        .unwrap()
        .with_sink(sink.clone());
    (extractor, sink)
}

fn utc_millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> i64 {
    chrono::NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_milli_opt(h, mi, s, ms)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

fn found(extraction: &Extraction) -> &ExtractedDate {
    match extraction {
        Extraction::Found(date) => date,
        other => panic!("expected Found, got {other:?}"),
    }
}

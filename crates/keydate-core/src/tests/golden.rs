use super::*;

#[test]
fn epoch_millis_key_is_the_exact_instant() {
    let (extractor, sink) = utc_extractor();
    let res = extractor.extract("1533959781804");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::DirectNumber);
    assert_eq!(date.instant.timestamp_millis(), 1_533_959_781_804);
    assert_eq!(
        date.instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "2018-08-11T03:56:21.804Z"
    );
    assert!(sink.is_empty());
}

#[test]
fn bare_iso_date_key_is_that_calendar_date() {
    // Date-only ISO strings are UTC, whatever the local zone.
    let (extractor, sink) = extractor_at(-300);
    let res = extractor.extract("2018-02-18");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::DirectLiteral);
    assert_eq!(date.instant.timestamp_millis(), utc_millis(2018, 2, 18, 0, 0, 0, 0));
    assert!(sink.is_empty());
}

#[test]
fn prefixed_index_rest_is_read_as_epoch_millis_not_a_calendar_date() {
    let (extractor, sink) = utc_extractor();
    let res = extractor.extract("(3)(7)20220131");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::PrefixedIndex);
    assert_eq!(date.instant.timestamp_millis(), 20_220_131);
    assert_eq!(
        date.instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "1970-01-01T05:37:00.131Z"
    );
    assert!(sink.is_empty());
}

#[test]
fn last_bracket_pair_holds_the_date() {
    let (extractor, sink) = utc_extractor();
    let res = extractor.extract("DATASET.SLOT->[2018-02-18 19:00:00]");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::Bracketed);
    assert_eq!(date.instant.timestamp_millis(), utc_millis(2018, 2, 18, 19, 0, 0, 0));
    assert!(sink.is_empty());

    // Offset-less literals are local time.
    let (extractor, _) = extractor_at(60);
    let res = extractor.extract("DATASET.SLOT->[2018-02-18 19:00:00]");
    assert_eq!(
        res.epoch_millis(),
        Some(utc_millis(2018, 2, 18, 18, 0, 0, 0))
    );
}

#[test]
fn dash_suffix_holds_a_month_name_literal() {
    let (extractor, sink) = utc_extractor();
    let res = extractor.extract("SLOT-Nov 04, 2019 3:15:00 PM");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::DashSuffix);
    assert_eq!(date.instant.timestamp_millis(), utc_millis(2019, 11, 4, 15, 15, 0, 0));
    assert!(sink.is_empty());
}

#[test]
fn two_digit_century_and_comma_rewrites_yield_2003_dot_5() {
    assert_eq!(apply_legacy_rewrites("00 03,5"), "2003.5");

    let (extractor, sink) = utc_extractor();
    let res = extractor.extract("[ID].[SLOT].[00 03,5]");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::Bracketed);
    // `2003.5` reads as year 2003, month 5: May 1st 2003, local midnight.
    assert_eq!(date.instant.timestamp_millis(), utc_millis(2003, 5, 1, 0, 0, 0, 0));
    assert!(sink.is_empty());
}

#[test]
fn garbage_is_not_found_with_exactly_one_diagnostic() {
    let (extractor, sink) = utc_extractor();
    assert_eq!(extractor.extract("garbage"), Extraction::NotFound);
    assert_eq!(
        sink.take(),
        vec![Diagnostic {
            key: "garbage".to_string(),
            reason: DiagnosticReason::NoDelimiter,
        }]
    );
}

#[test]
fn extraction_is_idempotent() {
    let (extractor, sink) = utc_extractor();
    for key in [
        "1533959781804",
        "(3)(7)20220131",
        "DATASET.SLOT->[2018-02-18 19:00:00]",
        "[ID].[SLOT].[00 03,5]",
        "[x].[2018-13-45]",
        "garbage",
    ] {
        assert_eq!(extractor.extract(key), extractor.extract(key), "{key}");
    }
    // Only `garbage` reports, once per call.
    assert_eq!(sink.len(), 2);
}

#[test]
fn month_level_keys_resolve_to_the_first_of_the_month() {
    let (extractor, sink) = utc_extractor();

    let res = extractor.extract("[T].[Month].[Nov 2019]");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::Bracketed);
    assert_eq!(date.instant.timestamp_millis(), utc_millis(2019, 11, 1, 0, 0, 0, 0));

    let res = extractor.extract("SLOT-Nov 2019");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::DashSuffix);
    assert_eq!(date.instant.timestamp_millis(), utc_millis(2019, 11, 1, 0, 0, 0, 0));

    // A day without a year is still not a date.
    assert_eq!(
        extractor.extract("SLOT-Nov 04"),
        Extraction::Invalid(InvalidToken {
            text: "Nov 04".to_string(),
            source: TokenSource::DashSuffix,
        })
    );
    assert!(sink.is_empty());
}

#[test]
fn overflowing_day_rolls_into_the_next_month_instead_of_a_dash_fallback() {
    let (extractor, sink) = utc_extractor();
    let res = extractor.extract("2019-02-29");
    let date = found(&res);
    assert_eq!(date.source, TokenSource::DirectLiteral);
    assert_eq!(date.instant.timestamp_millis(), utc_millis(2019, 3, 1, 0, 0, 0, 0));

    let res = extractor.extract("[x].[2019-02-31 10:00:00]");
    assert_eq!(
        res.epoch_millis(),
        Some(utc_millis(2019, 3, 3, 10, 0, 0, 0))
    );
    assert!(sink.is_empty());
}

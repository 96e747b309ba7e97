//! Ordered matcher strategies for locating a date token inside a tuple key.
//!
//! Each strategy either declines a key (`Unmatched`), settles it (`Resolved`), or claims it but
//! cannot isolate a token (`Unlocatable`). The registry runs them in order and the first one that
//! does not decline wins.

use crate::diagnostics::DiagnosticReason;
use crate::extract::{ExtractedDate, Extraction, InvalidToken, TokenSource};
use crate::literal::parse_date_literal;
use crate::number::parse_epoch_millis;
use crate::time::LocalZone;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static PREFIXED_INDEX_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
pub struct ExtractContext {
    pub zone: LocalZone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Unmatched,
    Resolved(Extraction),
    Unlocatable(DiagnosticReason),
}

pub type StrategyFn = fn(key: &str, ctx: &ExtractContext) -> StrategyOutcome;

#[derive(Debug, Clone)]
pub struct Strategy {
    pub id: &'static str,
    pub matcher: StrategyFn,
}

#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, strategy: Strategy) {
        self.strategies.push(strategy);
    }

    pub fn add_fn(&mut self, id: &'static str, matcher: StrategyFn) {
        self.add(Strategy { id, matcher });
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.id)
    }

    /// The strategy order used by the chart samples. Real keys rely on this precedence.
    pub fn default_legacy() -> Self {
        let mut reg = Self::new();
        reg.add_fn("direct-number", strategy_direct_number);
        reg.add_fn("direct-literal", strategy_direct_literal);
        reg.add_fn("prefixed-index", strategy_prefixed_index);
        reg.add_fn("bracketed", strategy_bracketed);
        reg.add_fn("dash-suffix", strategy_dash_suffix);
        reg
    }

    /// Runs strategies in order; returns the id of the one that settled the key, if any.
    pub fn run(&self, key: &str, ctx: &ExtractContext) -> (Option<&'static str>, StrategyOutcome) {
        for strategy in &self.strategies {
            match (strategy.matcher)(key, ctx) {
                StrategyOutcome::Unmatched => continue,
                outcome => return (Some(strategy.id), outcome),
            }
        }
        (
            None,
            StrategyOutcome::Unlocatable(DiagnosticReason::NoDelimiter),
        )
    }
}

fn found(instant: crate::time::DateTimeFixed, source: TokenSource) -> Extraction {
    Extraction::Found(ExtractedDate { instant, source })
}

fn invalid(text: &str, source: TokenSource) -> Extraction {
    Extraction::Invalid(InvalidToken {
        text: text.to_string(),
        source,
    })
}

/// Number first, then literal; whichever applies decides the result.
fn parse_token(text: &str, source: TokenSource, ctx: &ExtractContext) -> Extraction {
    match parse_epoch_millis(text) {
        Ok(Some(instant)) => found(instant, source),
        Err(_) => invalid(text, source),
        Ok(None) => match parse_date_literal(text, ctx.zone) {
            Ok(instant) => found(instant, source),
            Err(_) => invalid(text, source),
        },
    }
}

/// Rewrites applied to non-numeric delimited tokens before the literal parse.
///
/// - a leading `"00 "` becomes `"20"` (two-digit-century keys such as `00 03`)
/// - the first `,` becomes `.` (comma decimal separator in fractional seconds)
pub fn apply_legacy_rewrites(token: &str) -> Cow<'_, str> {
    let mut out = match token.strip_prefix("00 ") {
        Some(rest) => Cow::Owned(format!("20{rest}")),
        None => Cow::Borrowed(token),
    };
    if let Some(idx) = out.find(',') {
        out.to_mut().replace_range(idx..idx + 1, ".");
    }
    out
}

fn parse_delimited_token(token: &str, source: TokenSource, ctx: &ExtractContext) -> Extraction {
    match parse_epoch_millis(token) {
        Ok(Some(instant)) => found(instant, source),
        Err(_) => invalid(token, source),
        Ok(None) => {
            let rewritten = apply_legacy_rewrites(token);
            match parse_date_literal(&rewritten, ctx.zone) {
                Ok(instant) => found(instant, source),
                Err(_) => invalid(&rewritten, source),
            }
        }
    }
}

fn strategy_direct_number(key: &str, _ctx: &ExtractContext) -> StrategyOutcome {
    match parse_epoch_millis(key) {
        Ok(Some(instant)) => StrategyOutcome::Resolved(found(instant, TokenSource::DirectNumber)),
        _ => StrategyOutcome::Unmatched,
    }
}

fn strategy_direct_literal(key: &str, ctx: &ExtractContext) -> StrategyOutcome {
    match parse_date_literal(key, ctx.zone) {
        Ok(instant) => StrategyOutcome::Resolved(found(instant, TokenSource::DirectLiteral)),
        Err(_) => StrategyOutcome::Unmatched,
    }
}

fn strategy_prefixed_index(key: &str, ctx: &ExtractContext) -> StrategyOutcome {
    let re = PREFIXED_INDEX_RE.get_or_init(|| {
        Regex::new(r"(?s)^\([0-9]+\)\([0-9]+\)(?<rest>.*)$")
            .expect("prefixed index regex must compile")
    });
    let Some(rest) = re.captures(key).and_then(|caps| caps.name("rest")) else {
        return StrategyOutcome::Unmatched;
    };
    StrategyOutcome::Resolved(parse_token(rest.as_str(), TokenSource::PrefixedIndex, ctx))
}

fn strategy_bracketed(key: &str, ctx: &ExtractContext) -> StrategyOutcome {
    let Some(open) = key.rfind('[') else {
        return StrategyOutcome::Unmatched;
    };
    let start = open + 1;
    let Some(len) = key[start..].find(']') else {
        return StrategyOutcome::Unlocatable(DiagnosticReason::UnterminatedBracket);
    };
    let token = &key[start..start + len];
    if token.is_empty() {
        return StrategyOutcome::Unlocatable(DiagnosticReason::EmptyToken);
    }
    StrategyOutcome::Resolved(parse_delimited_token(token, TokenSource::Bracketed, ctx))
}

fn strategy_dash_suffix(key: &str, ctx: &ExtractContext) -> StrategyOutcome {
    let Some(dash) = key.rfind('-') else {
        return StrategyOutcome::Unmatched;
    };
    let token = &key[dash + 1..];
    if token.is_empty() {
        return StrategyOutcome::Unlocatable(DiagnosticReason::EmptyToken);
    }
    StrategyOutcome::Resolved(parse_delimited_token(token, TokenSource::DashSuffix, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTX: ExtractContext = ExtractContext {
        zone: LocalZone::Fixed(0),
    };

    #[test]
    fn legacy_rewrites_match_the_two_digit_century_golden() {
        assert_eq!(apply_legacy_rewrites("00 03,5"), "2003.5");
        assert_eq!(apply_legacy_rewrites("2018-02-18 19:00:00,250"), "2018-02-18 19:00:00.250");
        assert_eq!(apply_legacy_rewrites("1,2,3"), "1.2,3");
        assert_eq!(apply_legacy_rewrites("x00 03"), "x00 03");
        assert!(matches!(apply_legacy_rewrites("Nov 04"), Cow::Borrowed(_)));
    }

    #[test]
    fn default_order_is_fixed() {
        let ids: Vec<_> = StrategyRegistry::default_legacy().ids().collect();
        assert_eq!(
            ids,
            [
                "direct-number",
                "direct-literal",
                "prefixed-index",
                "bracketed",
                "dash-suffix"
            ]
        );
    }

    #[test]
    fn bracket_presence_shadows_the_dash_strategy() {
        let reg = StrategyRegistry::default_legacy();
        let (id, outcome) = reg.run("A-[B", &CTX);
        assert_eq!(id, Some("bracketed"));
        assert_eq!(
            outcome,
            StrategyOutcome::Unlocatable(DiagnosticReason::UnterminatedBracket)
        );
    }

    #[test]
    fn prefixed_index_takes_ascii_digits_only() {
        let reg = StrategyRegistry::default_legacy();
        let (id, outcome) = reg.run("(\u{663})(\u{667})20220131", &CTX);
        assert_eq!(id, None);
        assert_eq!(
            outcome,
            StrategyOutcome::Unlocatable(DiagnosticReason::NoDelimiter)
        );

        let (id, _) = reg.run("(3)(7)20220131", &CTX);
        assert_eq!(id, Some("prefixed-index"));
    }

    #[test]
    fn empty_registry_reports_no_delimiter() {
        let (id, outcome) = StrategyRegistry::new().run("2018-02-18", &CTX);
        assert_eq!(id, None);
        assert_eq!(
            outcome,
            StrategyOutcome::Unlocatable(DiagnosticReason::NoDelimiter)
        );
    }

    #[test]
    fn custom_registries_can_drop_strategies() {
        let mut reg = StrategyRegistry::new();
        reg.add_fn("dash-suffix", strategy_dash_suffix);
        let (id, outcome) = reg.run("a[b]-1000", &CTX);
        assert_eq!(id, Some("dash-suffix"));
        let StrategyOutcome::Resolved(Extraction::Found(date)) = outcome else {
            panic!("expected a found date, got {outcome:?}");
        };
        assert_eq!(date.instant.timestamp_millis(), 1000);
        assert_eq!(date.source, TokenSource::DashSuffix);
    }
}

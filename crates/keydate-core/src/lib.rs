#![forbid(unsafe_code)]

//! Date extraction from chart tuple keys (headless).
//!
//! Chart data points arrive with an opaque identifier, the *tuple key*, that encodes their
//! temporal dimension in one of several legacy shapes: a bare epoch-milliseconds number, a date
//! literal, `(i)(j)<rest>`, `...[<date>]`, or `...-<date>`. [`Extractor`] turns such a key into a
//! date or an explicit [`Extraction::NotFound`], never a placeholder date.
//!
//! Design goals:
//! - the fixed strategy precedence real keys rely on
//! - JavaScript `Date` parsing semantics for literals (including local-time rules)
//! - deterministic, testable outputs (pin the local offset with [`LocalZone::Fixed`])

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod format;
pub mod literal;
pub mod number;
pub mod strategy;
pub mod time;

pub use config::ExtractorConfig;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticReason, DiagnosticSink, TracingSink};
pub use error::{Error, Result};
pub use extract::{ExtractedDate, Extraction, Extractor, InvalidToken, TokenSource, time_extent};
pub use format::format_label;
pub use literal::parse_date_literal;
pub use number::parse_epoch_millis;
pub use strategy::{StrategyRegistry, apply_legacy_rewrites};
pub use time::LocalZone;

#[cfg(test)]
mod tests;

use crate::config::ExtractorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticReason, DiagnosticSink, TracingSink};
use crate::format::format_label;
use crate::strategy::{ExtractContext, StrategyOutcome, StrategyRegistry};
use crate::time::{DateTimeFixed, LocalZone};
use crate::{Error, Result};
use serde::Serialize;
use std::sync::Arc;

/// Which strategy isolated the date token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    DirectNumber,
    DirectLiteral,
    PrefixedIndex,
    Bracketed,
    DashSuffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDate {
    pub instant: DateTimeFixed,
    pub source: TokenSource,
}

/// A token that was located but did not parse as a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidToken {
    /// The text handed to the final parse (after legacy rewrites, for delimited tokens).
    pub text: String,
    pub source: TokenSource,
}

/// Outcome of extracting a date from one tuple key.
///
/// `Invalid` is silent; `NotFound` is the only outcome that produces a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(ExtractedDate),
    Invalid(InvalidToken),
    NotFound,
}

impl Extraction {
    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }

    pub fn date(&self) -> Option<DateTimeFixed> {
        match self {
            Extraction::Found(d) => Some(d.instant),
            _ => None,
        }
    }

    /// Axis coordinate of the data point.
    pub fn epoch_millis(&self) -> Option<i64> {
        self.date().map(|d| d.timestamp_millis())
    }

    pub fn source(&self) -> Option<TokenSource> {
        match self {
            Extraction::Found(d) => Some(d.source),
            Extraction::Invalid(t) => Some(t.source),
            Extraction::NotFound => None,
        }
    }

    /// Temporal label for the data point; `None` means the label is omitted.
    pub fn label(&self, pattern: &str, zone: LocalZone) -> Option<String> {
        self.date().map(|d| format_label(d, pattern, zone))
    }
}

/// Earliest and latest found instants, for sizing a time axis.
pub fn time_extent(extractions: &[Extraction]) -> Option<(DateTimeFixed, DateTimeFixed)> {
    extractions
        .iter()
        .filter_map(Extraction::date)
        .fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
}

/// Converts tuple keys to dates.
///
/// Stateless apart from its configuration; share it freely across render passes and threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: StrategyRegistry,
    zone: LocalZone,
    sink: Arc<dyn DiagnosticSink>,
    label_format: Option<String>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            registry: StrategyRegistry::default_legacy(),
            zone: LocalZone::System,
            sink: Arc::new(TracingSink),
            label_format: None,
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        let mut extractor = Self::new().with_local_zone(config.local_zone()?);
        extractor.label_format = config.label_format.clone();
        Ok(extractor)
    }

    pub fn with_local_zone(mut self, zone: LocalZone) -> Self {
        self.zone = zone;
        self
    }

    /// Pins the local timezone offset (minutes east of UTC) used for offset-less literals.
    ///
    /// `None` restores the system timezone.
    pub fn with_fixed_local_offset_minutes(self, offset_minutes: Option<i32>) -> Result<Self> {
        let zone = match offset_minutes {
            None => LocalZone::System,
            Some(mins) => LocalZone::fixed_minutes(mins).ok_or_else(|| Error::InvalidConfig {
                message: format!("local offset out of range: {mins} minutes"),
            })?,
        };
        Ok(self.with_local_zone(zone))
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_label_format(mut self, pattern: impl Into<String>) -> Self {
        self.label_format = Some(pattern.into());
        self
    }

    pub fn local_zone(&self) -> LocalZone {
        self.zone
    }

    pub fn label_format(&self) -> Option<&str> {
        self.label_format.as_deref()
    }

    pub fn extract(&self, key: &str) -> Extraction {
        let ctx = ExtractContext { zone: self.zone };
        let (strategy, outcome) = self.registry.run(key, &ctx);
        let reason = match outcome {
            StrategyOutcome::Resolved(extraction) => {
                tracing::trace!(
                    key,
                    strategy = strategy.unwrap_or("-"),
                    found = extraction.is_found(),
                    "tuple key resolved"
                );
                return extraction;
            }
            StrategyOutcome::Unlocatable(reason) => reason,
            StrategyOutcome::Unmatched => DiagnosticReason::NoDelimiter,
        };
        self.sink.report(&Diagnostic {
            key: key.to_string(),
            reason,
        });
        Extraction::NotFound
    }

    pub fn extract_all<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Vec<Extraction> {
        keys.into_iter().map(|key| self.extract(key)).collect()
    }

    /// Formats an extraction with the configured label pattern.
    pub fn label(&self, extraction: &Extraction) -> Option<String> {
        let pattern = self.label_format.as_deref()?;
        extraction.label(pattern, self.zone)
    }
}

use serde::Serialize;
use std::sync::Mutex;

/// Why no date token could be located in a tuple key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// Neither a `[` nor a `-` delimiter is present.
    NoDelimiter,
    /// The last `[` has no `]` after it.
    UnterminatedBracket,
    /// The delimited span is empty.
    EmptyToken,
}

impl DiagnosticReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticReason::NoDelimiter => "no_delimiter",
            DiagnosticReason::UnterminatedBracket => "unterminated_bracket",
            DiagnosticReason::EmptyToken => "empty_token",
        }
    }
}

impl std::fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub key: String,
    pub reason: DiagnosticReason,
}

/// Receives one `Diagnostic` per tuple key for which no date token could be located.
pub trait DiagnosticSink: std::fmt::Debug + Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Emits diagnostics as `WARN` tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            key = %diagnostic.key,
            reason = %diagnostic.reason,
            "unable to locate a date token in tuple key"
        );
    }
}

/// Buffers diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }
}

//! Recoverable migration diagnostics
//!
//! Converters never fail on a bad (index, value) pair. They record what they
//! dropped or rewrote here and move on. Every entry is also emitted through
//! `tracing` at the matching level, so an operator watching the log sees the
//! same stream the report carries.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Noted for review, query semantics unchanged
    Info,
    /// Query semantics were narrowed or widened
    Warning,
    /// An (index, value) pair was dropped
    Error,
}

/// Stable diagnostic codes
pub mod codes {
    pub const UNKNOWN_FIELD: &str = "UNKNOWN_FIELD";
    pub const FIELD_DISABLED: &str = "FIELD_DISABLED";
    pub const UNDEFINED_OPERATION: &str = "UNDEFINED_OPERATION";
    pub const UNRESOLVABLE_OPERATION: &str = "UNRESOLVABLE_OPERATION";
    pub const INVALID_OPERATION: &str = "INVALID_OPERATION";
    pub const MALFORMED_VALUE: &str = "MALFORMED_VALUE";
    pub const SELECTION_AND_DEGRADED: &str = "SELECTION_AND_DEGRADED";
    pub const NON_RECURSIVE_PATH: &str = "NON_RECURSIVE_PATH";
    pub const MULTIPLE_PATHS: &str = "MULTIPLE_PATHS";
    pub const BOOLEAN_VALUE_UNKNOWN: &str = "BOOLEAN_VALUE_UNKNOWN";
    pub const INT_RANGE_UNSUPPORTED: &str = "INT_RANGE_UNSUPPORTED";
    pub const INT_DIRECTION_UNKNOWN: &str = "INT_DIRECTION_UNKNOWN";
    pub const INT_MULTIPLE_VALUES: &str = "INT_MULTIPLE_VALUES";
    pub const DATE_OPERATION_DROPPED: &str = "DATE_OPERATION_DROPPED";
}

/// A single recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity
    pub level: Level,

    /// Stable code from [`codes`]
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Catalog index the diagnostic is about, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: Level, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            code: code.into(),
            message: message.into(),
            index: None,
        }
    }

    /// Set the index
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }
}

/// Collector for one object's diagnostics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an info entry
    pub fn info(&mut self, code: &str, index: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(code, index, "{}", message);
        self.push(Diagnostic::new(Level::Info, code, message).with_index(index));
    }

    /// Record a warning
    pub fn warn(&mut self, code: &str, index: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(code, index, "{}", message);
        self.push(Diagnostic::new(Level::Warning, code, message).with_index(index));
    }

    /// Record an error
    pub fn error(&mut self, code: &str, index: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(code, index, "{}", message);
        self.push(Diagnostic::new(Level::Error, code, message).with_index(index));
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// All entries in recording order
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Whether any entry carries the given code
    pub fn contains(&self, code: &str) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    /// Entries at the given level
    pub fn at_level(&self, level: Level) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.level == level)
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.at_level(Level::Warning).count()
    }

    /// Number of errors
    pub fn error_count(&self) -> usize {
        self.at_level(Level::Error).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Move all entries of `other` into this collector
    pub fn merge(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        format!(
            "{} errors, {} warnings, {} info",
            self.error_count(),
            self.warning_count(),
            self.at_level(Level::Info).count()
        )
    }
}

//! Recoverable decode findings.
//!
//! Decoding is fail-open: unknown or deprecated shapes resolve to a safe
//! default and are recorded here rather than written to a global logger.

use serde::Serialize;
use tracing::debug;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The input was understood differently from what it literally says.
    Warning,
    /// Informational message.
    Info,
}

impl Severity {
    /// Get the label for this severity level.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// Unknown `combine` value, defaulted to AND.
pub const UNKNOWN_COMBINE: &str = "W001";
/// `matchers` present but not a list.
pub const MATCHERS_NOT_A_LIST: &str = "W002";
/// Unrecognised `match` value, fell back to equality.
pub const UNRECOGNISED_MATCHER: &str = "W003";
/// No `match` key and no known rule key, fell back to equality.
pub const UNRECOGNISED_DEFINITION: &str = "W004";
/// Deprecated `real` alias.
pub const DEPRECATED_REAL: &str = "W005";
/// Decoded min/max type with min greater than max.
pub const MIN_EXCEEDS_MAX: &str = "W006";
/// `include`, `min` or `max` matcher without its value key, fell back to equality.
pub const MISSING_RULE_VALUE: &str = "W007";
/// Non-mapping entry in `matchers` skipped.
pub const SKIPPED_ENTRY: &str = "I001";
/// Regex pattern uses syntax the local engine cannot check (look-around, backreferences, ...).
pub const UNCHECKED_REGEX: &str = "I002";

/// A single finding recorded while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity of the diagnostic.
    pub severity: Severity,
    /// Stable code (e.g., "W003").
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Location within the decoded mapping (e.g., "matchers[1].combine").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Create a new info diagnostic.
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code: code.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Set the location for this diagnostic.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        if !location.is_empty() {
            self.location = Some(location);
        }
        self
    }
}

/// Diagnostics accumulated across one decode call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// All diagnostics, in the order they were recorded.
    pub items: Vec<Diagnostic>,
    /// Number of warning-level diagnostics.
    pub warnings: usize,
}

impl Diagnostics {
    /// Create a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and mirror it as a `debug` event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        debug!(
            code = %diagnostic.code,
            location = diagnostic.location.as_deref().unwrap_or(""),
            "{}",
            diagnostic.message
        );
        if diagnostic.severity == Severity::Warning {
            self.warnings += 1;
        }
        self.items.push(diagnostic);
    }

    /// Check if any warnings were recorded.
    pub fn has_warnings(&self) -> bool {
        self.warnings > 0
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of recorded diagnostics, info included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over recorded diagnostics in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// True if any recorded diagnostic carries `code`.
    pub fn contains_code(&self, code: &str) -> bool {
        self.items.iter().any(|d| d.code == code)
    }

    /// Merge another set into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        self.warnings += other.warnings;
        self.items.extend(other.items);
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A decoded value together with everything recorded while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// The decoded value.
    pub value: T,
    /// Findings recorded while decoding `value`.
    pub diagnostics: Diagnostics,
}

impl<T> Decoded<T> {
    /// Pair a value with its diagnostics.
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }

    /// Drop the diagnostics and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

//! Hard failures raised while decoding or encoding matching rules.
//!
//! Anything recoverable is reported through [`Diagnostics`](crate::Diagnostics)
//! instead and never shows up here.

use crate::spec_version::SpecVersion;

/// Errors that abort a decode or encode call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchingRuleError {
    #[error("Matcher definition is missing required field '{field}'")]
    MissingField { field: String },

    #[error("Field '{field}' must be an integer, found {found}")]
    NotAnInteger { field: String, found: String },

    #[error("Field '{field}' has value '{value}' which is not a valid integer")]
    InvalidInteger { field: String, value: String },

    #[error("Cannot represent an empty rule group in the {version} (pre-V3) format")]
    EmptyGroup { version: SpecVersion },

    #[error("Minimum {min} is greater than maximum {max}")]
    MinGreaterThanMax { min: usize, max: usize },

    #[error("Invalid specification version: {0}")]
    InvalidSpecVersion(String),

    #[error("Matching rules at '{path}': {source}")]
    AtPath {
        path: String,
        #[source]
        source: Box<MatchingRuleError>,
    },
}

impl MatchingRuleError {
    pub(crate) fn missing(field: &str) -> Self {
        MatchingRuleError::MissingField {
            field: field.to_string(),
        }
    }

    pub(crate) fn at_path(self, path: &str) -> Self {
        MatchingRuleError::AtPath {
            path: path.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result alias for matching rule operations.
pub type Result<T> = std::result::Result<T, MatchingRuleError>;

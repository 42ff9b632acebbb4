//! Matching rule model and contract-file codec for Rift.
//!
//! Matching rules replace byte-for-byte equality in contract files with
//! declarative checks (type, regex, date format, ranges, ...). This crate
//! models those rules and maps them to and from the loosely typed JSON form
//! contract files use, for both the legacy (pre-V3) and V3+ layouts.
//!
//! Decoding never aborts on unknown or deprecated shapes: it falls back to
//! equality and records a [`Diagnostic`] instead.
//!
//! # Example
//!
//! ```
//! use rift_matching_rules::{MatchingRule, MatchingRuleGroup, RuleLogic, SpecVersion};
//! use serde_json::json;
//!
//! let map = json!({
//!     "matchers": [{ "match": "regex", "regex": "\\d+" }, { "match": "real" }],
//!     "combine": "OR"
//! });
//!
//! let decoded = MatchingRuleGroup::from_map(map.as_object().unwrap()).unwrap();
//! assert_eq!(decoded.value.rule_logic(), RuleLogic::Or);
//! assert_eq!(decoded.value.rules()[0], MatchingRule::regex("\\d+"));
//! assert!(decoded.diagnostics.has_warnings());
//!
//! let legacy = decoded.value.to_map(SpecVersion::V2).unwrap();
//! assert_eq!(legacy["match"], "regex");
//! ```

mod decode;
mod diagnostics;
mod error;
mod group;
mod report;
mod rule;
mod spec_version;

pub use decode::rule_from_map;
pub use diagnostics::{Decoded, Diagnostic, Diagnostics, Severity};
pub use error::{MatchingRuleError, Result};
pub use group::MatchingRuleGroup;
pub use report::{
    decode_document, fails_strict, total_warnings, GroupReport, ReportOptions, ROOT_LABEL,
};
pub use rule::{
    MatchingRule, NumberKind, RuleLogic, DEFAULT_DATE_FORMAT, DEFAULT_TIMESTAMP_FORMAT,
    DEFAULT_TIME_FORMAT,
};
pub use spec_version::SpecVersion;

/// Diagnostic codes recorded by the decoder.
pub mod codes {
    pub use crate::diagnostics::{
        DEPRECATED_REAL, MATCHERS_NOT_A_LIST, MIN_EXCEEDS_MAX, MISSING_RULE_VALUE,
        SKIPPED_ENTRY, UNCHECKED_REGEX, UNKNOWN_COMBINE, UNRECOGNISED_DEFINITION,
        UNRECOGNISED_MATCHER,
    };
}

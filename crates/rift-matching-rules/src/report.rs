//! Per-path decode reports for whole contract fragments.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::group::MatchingRuleGroup;
use crate::spec_version::SpecVersion;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Label used for a document decoded as a single group.
pub const ROOT_LABEL: &str = "<root>";

/// How a document is decoded and, optionally, re-encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Version the document was written with.
    pub from: SpecVersion,
    /// Re-encode every group for this version.
    pub to: Option<SpecVersion>,
    /// Treat the top-level object as path -> rule group.
    pub paths: bool,
}

/// Result of decoding one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupReport {
    /// Path the group is attached to; `None` for a single-group document.
    pub path: Option<String>,
    /// Number of decoded rules.
    pub rules: usize,
    /// Findings recorded while decoding.
    pub diagnostics: Diagnostics,
    /// Re-encoded form, when a target version was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded: Option<Value>,
}

impl GroupReport {
    /// Path label for display.
    pub fn label(&self) -> &str {
        self.path.as_deref().unwrap_or(ROOT_LABEL)
    }
}

/// Decode a document into one report per group.
///
/// With `paths` set, each object-valued key is decoded as its own group and
/// other values are skipped. A hard error names the path it came from.
pub fn decode_document(
    document: &Map<String, Value>,
    options: &ReportOptions,
) -> Result<Vec<GroupReport>> {
    if !options.paths {
        return Ok(vec![decode_group_at(None, document, options)?]);
    }

    let mut reports = Vec::with_capacity(document.len());
    for (path, value) in document {
        match value {
            Value::Object(map) => reports.push(decode_group_at(Some(path), map, options)?),
            other => debug!(path = %path, "Skipping non-object entry {other}"),
        }
    }
    Ok(reports)
}

fn decode_group_at(
    path: Option<&str>,
    map: &Map<String, Value>,
    options: &ReportOptions,
) -> Result<GroupReport> {
    let label = path.unwrap_or(ROOT_LABEL);
    let decoded =
        MatchingRuleGroup::from_map_for(options.from, map).map_err(|e| e.at_path(label))?;

    let encoded = match options.to {
        Some(version) => Some(Value::Object(
            decoded.value.to_map(version).map_err(|e| e.at_path(label))?,
        )),
        None => None,
    };

    Ok(GroupReport {
        path: path.map(str::to_string),
        rules: decoded.value.len(),
        diagnostics: decoded.diagnostics,
        encoded,
    })
}

/// Total warnings across all reports.
pub fn total_warnings(reports: &[GroupReport]) -> usize {
    reports.iter().map(|r| r.diagnostics.warnings).sum()
}

/// In strict mode any warning is a failure.
pub fn fails_strict(reports: &[GroupReport], strict: bool) -> bool {
    strict && total_warnings(reports) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{SKIPPED_ENTRY, UNRECOGNISED_MATCHER};
    use crate::error::MatchingRuleError;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    fn paths_options() -> ReportOptions {
        ReportOptions {
            paths: true,
            ..ReportOptions::default()
        }
    }

    #[test]
    fn test_single_group_document() {
        let document = object(json!({"matchers": [{"match": "type"}], "combine": "AND"}));
        let reports = decode_document(&document, &ReportOptions::default()).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].path, None);
        assert_eq!(reports[0].label(), "<root>");
        assert_eq!(reports[0].rules, 1);
        assert!(reports[0].encoded.is_none());
    }

    #[test]
    fn test_paths_split_into_one_report_each() {
        let document = object(json!({
            "$.body.id": {"matchers": [{"match": "integer"}]},
            "$.body.name": {"matchers": [{"match": "soundex"}, "skip"]},
            "$.body.note": "not a group",
            "$.body.tags": [1, 2]
        }));
        let reports = decode_document(&document, &paths_options()).unwrap();

        let labels: Vec<&str> = reports.iter().map(GroupReport::label).collect();
        assert_eq!(labels, vec!["$.body.id", "$.body.name"]);
        assert!(reports[0].diagnostics.is_empty());
        assert!(reports[1].diagnostics.contains_code(UNRECOGNISED_MATCHER));
        assert!(reports[1].diagnostics.contains_code(SKIPPED_ENTRY));
        assert_eq!(total_warnings(&reports), 1);
    }

    #[test]
    fn test_paths_with_legacy_rules() {
        let document = object(json!({
            "$.a": {"match": "regex", "regex": "x"},
            "$.b": {"min": 1}
        }));
        let options = ReportOptions {
            from: SpecVersion::V2,
            to: Some(SpecVersion::V3),
            paths: true,
        };
        let reports = decode_document(&document, &options).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(
            reports[1].encoded,
            Some(json!({"matchers": [{"match": "type", "min": 1}], "combine": "AND"}))
        );
    }

    #[test]
    fn test_decode_error_names_path() {
        let document = object(json!({
            "$.ok": {"matchers": []},
            "$.bad": {"matchers": [{"match": "regex"}]}
        }));
        let err = decode_document(&document, &paths_options()).unwrap_err();

        assert_eq!(
            err,
            MatchingRuleError::AtPath {
                path: "$.bad".to_string(),
                source: Box::new(MatchingRuleError::missing("matchers[0].regex")),
            }
        );
        assert!(err.to_string().contains("$.bad"));
    }

    #[test]
    fn test_encode_error_names_path() {
        let document = object(json!({"matchers": []}));
        let options = ReportOptions {
            to: Some(SpecVersion::V2),
            ..ReportOptions::default()
        };
        let err = decode_document(&document, &options).unwrap_err();

        assert!(matches!(
            err,
            MatchingRuleError::AtPath { ref path, ref source }
                if path == "<root>"
                    && **source == MatchingRuleError::EmptyGroup { version: SpecVersion::V2 }
        ));
    }

    #[test]
    fn test_strict_fails_only_on_warnings() {
        let clean = decode_document(
            &object(json!({"matchers": [{"match": "null"}, 7]})),
            &ReportOptions::default(),
        )
        .unwrap();
        assert!(!fails_strict(&clean, true));

        let warned = decode_document(
            &object(json!({"matchers": [{"match": "real"}]})),
            &ReportOptions::default(),
        )
        .unwrap();
        assert!(fails_strict(&warned, true));
        assert!(!fails_strict(&warned, false));
    }

    #[test]
    fn test_report_serializes_without_encoded() {
        let reports =
            decode_document(&object(json!({"matchers": []})), &ReportOptions::default()).unwrap();
        let json = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(json["path"], Value::Null);
        assert_eq!(json["rules"], 0);
        assert!(json.get("encoded").is_none());
    }
}

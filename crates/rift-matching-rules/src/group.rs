//! Rule groups and their version-aware codec.
//!
//! Before V3 a path carries exactly one rule, written as the rule's own
//! mapping. From V3 on a path carries a list of rules and a combine policy:
//!
//! ```json
//! { "matchers": [{ "match": "regex", "regex": "a" }], "combine": "AND" }
//! ```

use crate::decode::{decode_rule, rule_from_map};
use crate::diagnostics::{
    Decoded, Diagnostic, Diagnostics, MATCHERS_NOT_A_LIST, SKIPPED_ENTRY, UNKNOWN_COMBINE,
};
use crate::error::{MatchingRuleError, Result};
use crate::rule::{MatchingRule, RuleLogic};
use crate::spec_version::SpecVersion;
use serde_json::{Map, Value};

const MATCHERS: &str = "matchers";
const COMBINE: &str = "combine";

/// Ordered rules applied to one target, combined with a [`RuleLogic`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchingRuleGroup {
    rules: Vec<MatchingRule>,
    rule_logic: RuleLogic,
}

impl MatchingRuleGroup {
    /// Empty group with AND logic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty group with the given logic.
    pub fn with_logic(rule_logic: RuleLogic) -> Self {
        Self {
            rules: Vec::new(),
            rule_logic,
        }
    }

    /// Group from an ordered rule list.
    pub fn from_rules(rules: Vec<MatchingRule>, rule_logic: RuleLogic) -> Self {
        Self { rules, rule_logic }
    }

    /// Single-rule group with AND logic.
    pub fn from_rule(rule: MatchingRule) -> Self {
        Self::from_rules(vec![rule], RuleLogic::And)
    }

    /// Append a rule, keeping insertion order.
    pub fn add_rule(&mut self, rule: MatchingRule) {
        self.rules.push(rule);
    }

    /// Rules in order.
    pub fn rules(&self) -> &[MatchingRule] {
        &self.rules
    }

    /// How the rules are combined.
    pub fn rule_logic(&self) -> RuleLogic {
        self.rule_logic
    }

    /// Check if the group has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Encode for the given specification version.
    ///
    /// Legacy tiers keep only the first rule; an empty group has no legacy form.
    pub fn to_map(&self, version: SpecVersion) -> Result<Map<String, Value>> {
        if version.is_legacy() {
            return self
                .rules
                .first()
                .map(MatchingRule::to_map)
                .ok_or(MatchingRuleError::EmptyGroup { version });
        }

        let matchers = self
            .rules
            .iter()
            .map(|rule| Value::Object(rule.to_map()))
            .collect();

        let mut map = Map::new();
        map.insert(MATCHERS.to_string(), Value::Array(matchers));
        map.insert(
            COMBINE.to_string(),
            Value::from(self.rule_logic.as_str()),
        );
        Ok(map)
    }

    /// Decode the V3 `{matchers, combine}` form.
    pub fn from_map(map: &Map<String, Value>) -> Result<Decoded<Self>> {
        let mut diagnostics = Diagnostics::new();
        let group = decode_group(map, &mut diagnostics)?;
        Ok(Decoded::new(group, diagnostics))
    }

    /// Decode using the shape the given specification version writes.
    ///
    /// Legacy tiers read the mapping as a single rule.
    pub fn from_map_for(version: SpecVersion, map: &Map<String, Value>) -> Result<Decoded<Self>> {
        if version.is_legacy() {
            Ok(rule_from_map(map)?.map(Self::from_rule))
        } else {
            Self::from_map(map)
        }
    }
}

impl From<MatchingRule> for MatchingRuleGroup {
    fn from(rule: MatchingRule) -> Self {
        Self::from_rule(rule)
    }
}

impl FromIterator<MatchingRule> for MatchingRuleGroup {
    fn from_iter<I: IntoIterator<Item = MatchingRule>>(iter: I) -> Self {
        Self::from_rules(iter.into_iter().collect(), RuleLogic::And)
    }
}

fn decode_group(
    map: &Map<String, Value>,
    diagnostics: &mut Diagnostics,
) -> Result<MatchingRuleGroup> {
    let mut group = MatchingRuleGroup::new();

    if let Some(combine) = map.get(COMBINE) {
        match combine.as_str().map(str::parse::<RuleLogic>) {
            Some(Ok(logic)) => group.rule_logic = logic,
            _ => diagnostics.push(
                Diagnostic::warning(
                    UNKNOWN_COMBINE,
                    format!("{combine} is not a valid value for combine, using AND"),
                )
                .with_location(COMBINE),
            ),
        }
    }

    match map.get(MATCHERS) {
        Some(Value::Array(matchers)) => {
            for (idx, entry) in matchers.iter().enumerate() {
                let location = format!("{MATCHERS}[{idx}]");
                match entry {
                    Value::Object(rule) => {
                        group.add_rule(decode_rule(rule, &location, diagnostics)?);
                    }
                    other => diagnostics.push(
                        Diagnostic::info(
                            SKIPPED_ENTRY,
                            format!("Skipping matcher entry {other}, it is not a mapping"),
                        )
                        .with_location(location),
                    ),
                }
            }
        }
        Some(other) => diagnostics.push(
            Diagnostic::warning(
                MATCHERS_NOT_A_LIST,
                format!("Expected a list of matchers, found {other}; ignoring it"),
            )
            .with_location(MATCHERS),
        ),
        None => {}
    }

    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::NumberKind;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn test_v3_encoding_preserves_order_and_logic() {
        let group = MatchingRuleGroup::from_rules(
            vec![MatchingRule::regex("a"), MatchingRule::Equality],
            RuleLogic::Or,
        );
        let map = group.to_map(SpecVersion::V3).unwrap();
        assert_eq!(
            Value::Object(map),
            json!({
                "matchers": [{"match": "regex", "regex": "a"}, {"match": "equality"}],
                "combine": "OR"
            })
        );
    }

    #[test]
    fn test_legacy_encoding_keeps_first_rule_only() {
        let group = MatchingRuleGroup::from_rules(
            vec![MatchingRule::MinType(1), MatchingRule::Null],
            RuleLogic::Or,
        );
        let map = group.to_map(SpecVersion::V2).unwrap();
        assert_eq!(Value::Object(map), json!({"match": "type", "min": 1}));
    }

    #[test]
    fn test_empty_group_encoding() {
        let group = MatchingRuleGroup::new();
        assert_eq!(
            group.to_map(SpecVersion::V2).unwrap_err(),
            MatchingRuleError::EmptyGroup {
                version: SpecVersion::V2
            }
        );
        assert_eq!(
            Value::Object(group.to_map(SpecVersion::V3).unwrap()),
            json!({"matchers": [], "combine": "AND"})
        );
        assert!(group.to_map(SpecVersion::Unknown).is_err());
    }

    #[test]
    fn test_decode_group() {
        let decoded = MatchingRuleGroup::from_map(&object(json!({
            "matchers": [{"match": "integer"}, {"match": "include", "value": "x"}],
            "combine": "OR"
        })))
        .unwrap();

        assert!(decoded.diagnostics.is_empty());
        assert_eq!(decoded.value.rule_logic(), RuleLogic::Or);
        assert_eq!(
            decoded.value.rules(),
            &[
                MatchingRule::Number(NumberKind::Integer),
                MatchingRule::include("x")
            ]
        );
    }

    #[test]
    fn test_unknown_combine_keeps_and() {
        let decoded = MatchingRuleGroup::from_map(&object(json!({
            "matchers": [{"match": "null"}],
            "combine": "or"
        })))
        .unwrap();

        assert_eq!(decoded.value.rule_logic(), RuleLogic::And);
        assert_eq!(decoded.value.rules(), &[MatchingRule::Null]);
        assert!(decoded.diagnostics.contains_code(UNKNOWN_COMBINE));
    }

    #[test]
    fn test_non_list_matchers_is_empty_group() {
        let decoded =
            MatchingRuleGroup::from_map(&object(json!({"matchers": {"match": "null"}}))).unwrap();
        assert!(decoded.value.is_empty());
        assert!(decoded.diagnostics.contains_code(MATCHERS_NOT_A_LIST));
    }

    #[test]
    fn test_non_mapping_entries_are_skipped() {
        let decoded = MatchingRuleGroup::from_map(&object(json!({
            "matchers": ["regex", {"match": "values"}, 3]
        })))
        .unwrap();

        assert_eq!(decoded.value.rules(), &[MatchingRule::Values]);
        assert!(!decoded.diagnostics.has_warnings());
        assert_eq!(decoded.diagnostics.len(), 2);
        assert_eq!(
            decoded.diagnostics.items[1].location.as_deref(),
            Some("matchers[2]")
        );
    }

    #[test]
    fn test_missing_keys_give_empty_and_group() {
        let decoded = MatchingRuleGroup::from_map(&Map::new()).unwrap();
        assert_eq!(decoded.value, MatchingRuleGroup::new());
        assert!(decoded.diagnostics.is_empty());
    }

    #[test]
    fn test_hard_error_names_entry() {
        let err = MatchingRuleGroup::from_map(&object(json!({
            "matchers": [{"match": "equality"}, {"match": "type", "max": "many"}]
        })))
        .unwrap_err();

        assert_eq!(
            err,
            MatchingRuleError::InvalidInteger {
                field: "matchers[1].max".to_string(),
                value: "many".to_string()
            }
        );
    }

    #[test]
    fn test_from_map_for_legacy_reads_single_rule() {
        let decoded = MatchingRuleGroup::from_map_for(
            SpecVersion::V2,
            &object(json!({"match": "regex", "regex": "\\d"})),
        )
        .unwrap();
        assert_eq!(decoded.value, MatchingRuleGroup::from_rule(MatchingRule::regex("\\d")));
    }

    #[test]
    fn test_programmatic_construction() {
        let mut group = MatchingRuleGroup::with_logic(RuleLogic::Or);
        group.add_rule(MatchingRule::Type);
        group.add_rule(MatchingRule::Null);
        assert_eq!(group.len(), 2);
        assert_eq!(group.rule_logic(), RuleLogic::Or);

        let collected: MatchingRuleGroup = vec![MatchingRule::Values].into_iter().collect();
        assert_eq!(collected, MatchingRuleGroup::from(MatchingRule::Values));
    }
}

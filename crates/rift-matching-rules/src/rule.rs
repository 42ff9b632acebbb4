//! Matching rule model.
//!
//! A [`MatchingRule`] describes how an expected value is compared against an
//! actual one. Rules are plain values: two rules with equal fields are equal.
//!
//! # Wire form
//!
//! | Variant | `match` | extra keys |
//! |---------|---------|------------|
//! | `Equality` | `equality` | |
//! | `Regex` | `regex` | `regex` |
//! | `Type` | `type` | |
//! | `MinType` | `type` | `min` |
//! | `MaxType` | `type` | `max` |
//! | `MinMaxType` | `type` | `min`, `max` |
//! | `Number` | `number` / `integer` / `decimal` | |
//! | `Date` | `date` | `date` |
//! | `Time` | `time` | `time` |
//! | `Timestamp` | `timestamp` | `timestamp` |
//! | `Include` | `include` | `value` |
//! | `Null` | `null` | |
//! | `Values` | `values` | |

use crate::error::{MatchingRuleError, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Date format used when a date rule names none.
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-MM-dd";
/// Time format used when a time rule names none.
pub const DEFAULT_TIME_FORMAT: &str = "HH:mm:ss";
/// Timestamp format used when a timestamp rule names none.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "yyyy-MM-dd HH:mm:ssZZZ";

// Wire keys shared by the encoder and the decoder.
pub(crate) const MATCH: &str = "match";
pub(crate) const REGEX: &str = "regex";
pub(crate) const MIN: &str = "min";
pub(crate) const MAX: &str = "max";
pub(crate) const DATE: &str = "date";
pub(crate) const TIME: &str = "time";
pub(crate) const TIMESTAMP: &str = "timestamp";
pub(crate) const VALUE: &str = "value";

/// Flavour of numeric match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// Any numeric value
    Number,
    /// Whole numbers only
    Integer,
    /// Numbers with a fractional part
    Decimal,
}

impl NumberKind {
    /// The `match` value for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            NumberKind::Number => "number",
            NumberKind::Integer => "integer",
            NumberKind::Decimal => "decimal",
        }
    }
}

/// A single matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchingRule {
    /// Exact equality
    Equality,
    /// Value must match a regular expression. `example` is advisory and is never serialized.
    Regex {
        pattern: String,
        example: Option<String>,
    },
    /// Any value of the same type
    Type,
    /// Same type, collection length at least `min`
    MinType(usize),
    /// Same type, collection length at most `max`
    MaxType(usize),
    /// Same type, collection length within `min..=max`
    MinMaxType { min: usize, max: usize },
    /// Numeric value of the given kind
    Number(NumberKind),
    /// Date in the given format
    Date(String),
    /// Time in the given format
    Time(String),
    /// Date and time in the given format
    Timestamp(String),
    /// Value must contain the substring
    Include(String),
    /// Value must be null
    Null,
    /// Match map values, ignore keys
    Values,
}

impl MatchingRule {
    /// Regex rule without an example.
    pub fn regex(pattern: impl Into<String>) -> Self {
        MatchingRule::Regex {
            pattern: pattern.into(),
            example: None,
        }
    }

    /// Regex rule carrying an advisory example value.
    pub fn regex_with_example(pattern: impl Into<String>, example: impl Into<String>) -> Self {
        MatchingRule::Regex {
            pattern: pattern.into(),
            example: Some(example.into()),
        }
    }

    /// Build a min/max type rule, rejecting `min > max`.
    pub fn min_max(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(MatchingRuleError::MinGreaterThanMax { min, max });
        }
        Ok(MatchingRule::MinMaxType { min, max })
    }

    /// Substring rule.
    pub fn include(substring: impl Into<String>) -> Self {
        MatchingRule::Include(substring.into())
    }

    /// Date rule with a custom format.
    pub fn date(format: impl Into<String>) -> Self {
        MatchingRule::Date(format.into())
    }

    /// Time rule with a custom format.
    pub fn time(format: impl Into<String>) -> Self {
        MatchingRule::Time(format.into())
    }

    /// Timestamp rule with a custom format.
    pub fn timestamp(format: impl Into<String>) -> Self {
        MatchingRule::Timestamp(format.into())
    }

    /// Date rule using [`DEFAULT_DATE_FORMAT`].
    pub fn default_date() -> Self {
        Self::date(DEFAULT_DATE_FORMAT)
    }

    /// Time rule using [`DEFAULT_TIME_FORMAT`].
    pub fn default_time() -> Self {
        Self::time(DEFAULT_TIME_FORMAT)
    }

    /// Timestamp rule using [`DEFAULT_TIMESTAMP_FORMAT`].
    pub fn default_timestamp() -> Self {
        Self::timestamp(DEFAULT_TIMESTAMP_FORMAT)
    }

    /// The `match` value this rule is written with.
    pub fn name(&self) -> &'static str {
        match self {
            MatchingRule::Equality => "equality",
            MatchingRule::Regex { .. } => "regex",
            MatchingRule::Type
            | MatchingRule::MinType(_)
            | MatchingRule::MaxType(_)
            | MatchingRule::MinMaxType { .. } => "type",
            MatchingRule::Number(kind) => kind.as_str(),
            MatchingRule::Date(_) => "date",
            MatchingRule::Time(_) => "time",
            MatchingRule::Timestamp(_) => "timestamp",
            MatchingRule::Include(_) => "include",
            MatchingRule::Null => "null",
            MatchingRule::Values => "values",
        }
    }

    /// Render this rule to its generic mapping form.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(MATCH.to_string(), Value::from(self.name()));

        match self {
            MatchingRule::Regex { pattern, .. } => {
                map.insert(REGEX.to_string(), Value::from(pattern.as_str()));
            }
            MatchingRule::MinType(min) => {
                map.insert(MIN.to_string(), Value::from(*min));
            }
            MatchingRule::MaxType(max) => {
                map.insert(MAX.to_string(), Value::from(*max));
            }
            MatchingRule::MinMaxType { min, max } => {
                map.insert(MIN.to_string(), Value::from(*min));
                map.insert(MAX.to_string(), Value::from(*max));
            }
            MatchingRule::Date(format) => {
                map.insert(DATE.to_string(), Value::from(format.as_str()));
            }
            MatchingRule::Time(format) => {
                map.insert(TIME.to_string(), Value::from(format.as_str()));
            }
            MatchingRule::Timestamp(format) => {
                map.insert(TIMESTAMP.to_string(), Value::from(format.as_str()));
            }
            MatchingRule::Include(substring) => {
                map.insert(VALUE.to_string(), Value::from(substring.as_str()));
            }
            MatchingRule::Equality
            | MatchingRule::Type
            | MatchingRule::Number(_)
            | MatchingRule::Null
            | MatchingRule::Values => {}
        }

        map
    }
}

impl Serialize for MatchingRule {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_map().serialize(serializer)
    }
}

/// How several rules attached to one target are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleLogic {
    /// Every rule must match
    #[default]
    And,
    /// At least one rule must match
    Or,
}

impl RuleLogic {
    /// Wire form: `AND` or `OR`.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleLogic::And => "AND",
            RuleLogic::Or => "OR",
        }
    }
}

impl fmt::Display for RuleLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: only `AND` and `OR` are accepted.
impl FromStr for RuleLogic {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "AND" => Ok(RuleLogic::And),
            "OR" => Ok(RuleLogic::Or),
            other => Err(format!("unknown rule logic '{other}'")),
        }
    }
}

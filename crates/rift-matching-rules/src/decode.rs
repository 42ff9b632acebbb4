//! Lenient single-rule decoder.
//!
//! Contract files written by different tools and specification versions
//! disagree on how a rule is spelled. Decoding tries, in order:
//!
//! 1. the `match` key, dispatching on its value;
//! 2. legacy keyed forms (`regex`, `min`, `max`, `timestamp`, `time`, `date`);
//! 3. equality, with a warning.
//!
//! Only malformed numbers and a regex rule without a pattern are hard errors.

use crate::diagnostics::{
    Decoded, Diagnostic, Diagnostics, DEPRECATED_REAL, MIN_EXCEEDS_MAX, MISSING_RULE_VALUE,
    UNCHECKED_REGEX, UNRECOGNISED_DEFINITION, UNRECOGNISED_MATCHER,
};
use crate::error::{MatchingRuleError, Result};
use crate::rule::{
    MatchingRule, NumberKind, DATE, DEFAULT_DATE_FORMAT, DEFAULT_TIMESTAMP_FORMAT,
    DEFAULT_TIME_FORMAT, MATCH, MAX, MIN, REGEX, TIME, TIMESTAMP, VALUE,
};
use serde_json::{Map, Value};

/// Decode one rule from its generic mapping form.
pub fn rule_from_map(map: &Map<String, Value>) -> Result<Decoded<MatchingRule>> {
    let mut diagnostics = Diagnostics::new();
    let rule = decode_rule(map, "", &mut diagnostics)?;
    Ok(Decoded::new(rule, diagnostics))
}

/// Decode one rule, recording findings against `location`.
pub(crate) fn decode_rule(
    map: &Map<String, Value>,
    location: &str,
    diagnostics: &mut Diagnostics,
) -> Result<MatchingRule> {
    let rule = if let Some(kind) = present(map, MATCH) {
        decode_match(map, kind, location, diagnostics)?
    } else if let Some(pattern) = present(map, REGEX) {
        MatchingRule::regex(string_form(pattern))
    } else if let Some(min) = present(map, MIN) {
        MatchingRule::MinType(strict_integer(min, &field_path(location, MIN))?)
    } else if let Some(max) = present(map, MAX) {
        MatchingRule::MaxType(strict_integer(max, &field_path(location, MAX))?)
    } else if let Some(format) = present(map, TIMESTAMP) {
        MatchingRule::Timestamp(string_form(format))
    } else if let Some(format) = present(map, TIME) {
        MatchingRule::Time(string_form(format))
    } else if let Some(format) = present(map, DATE) {
        MatchingRule::Date(string_form(format))
    } else {
        diagnostics.push(
            Diagnostic::warning(
                UNRECOGNISED_DEFINITION,
                format!(
                    "Unrecognised matcher definition {}, defaulting to equality",
                    Value::Object(map.clone())
                ),
            )
            .with_location(location),
        );
        MatchingRule::Equality
    };

    check_rule(&rule, location, diagnostics);
    Ok(rule)
}

fn decode_match(
    map: &Map<String, Value>,
    kind: &Value,
    location: &str,
    diagnostics: &mut Diagnostics,
) -> Result<MatchingRule> {
    let name = kind.as_str().unwrap_or_default();

    let rule = match name {
        "regex" => {
            let pattern = present(map, REGEX)
                .ok_or_else(|| MatchingRuleError::missing(&field_path(location, REGEX)))?;
            MatchingRule::regex(string_form(pattern))
        }
        "equality" => MatchingRule::Equality,
        "null" => MatchingRule::Null,
        "include" => match present(map, VALUE) {
            Some(value) => MatchingRule::Include(string_form(value)),
            None => missing_value(name, VALUE, location, diagnostics),
        },
        "type" => {
            let min = present(map, MIN)
                .map(|v| coerce_integer(v, &field_path(location, MIN)))
                .transpose()?;
            let max = present(map, MAX)
                .map(|v| coerce_integer(v, &field_path(location, MAX)))
                .transpose()?;
            match (min, max) {
                (Some(min), Some(max)) => MatchingRule::MinMaxType { min, max },
                (Some(min), None) => MatchingRule::MinType(min),
                (None, Some(max)) => MatchingRule::MaxType(max),
                (None, None) => MatchingRule::Type,
            }
        }
        "number" => MatchingRule::Number(NumberKind::Number),
        "integer" => MatchingRule::Number(NumberKind::Integer),
        "decimal" => MatchingRule::Number(NumberKind::Decimal),
        "real" => {
            diagnostics.push(
                Diagnostic::warning(
                    DEPRECATED_REAL,
                    "The 'real' matcher is deprecated, use 'decimal' instead",
                )
                .with_location(field_path(location, MATCH)),
            );
            MatchingRule::Number(NumberKind::Decimal)
        }
        MIN => match present(map, MIN) {
            Some(min) => MatchingRule::MinType(coerce_integer(min, &field_path(location, MIN))?),
            None => missing_value(name, MIN, location, diagnostics),
        },
        MAX => match present(map, MAX) {
            Some(max) => MatchingRule::MaxType(coerce_integer(max, &field_path(location, MAX))?),
            None => missing_value(name, MAX, location, diagnostics),
        },
        "timestamp" => {
            MatchingRule::Timestamp(format_or(map, TIMESTAMP, DEFAULT_TIMESTAMP_FORMAT))
        }
        "time" => MatchingRule::Time(format_or(map, TIME, DEFAULT_TIME_FORMAT)),
        "date" => MatchingRule::Date(format_or(map, DATE, DEFAULT_DATE_FORMAT)),
        "values" => MatchingRule::Values,
        _ => {
            diagnostics.push(
                Diagnostic::warning(
                    UNRECOGNISED_MATCHER,
                    format!("Unrecognised matcher {kind}, defaulting to equality"),
                )
                .with_location(field_path(location, MATCH)),
            );
            MatchingRule::Equality
        }
    };

    Ok(rule)
}

fn missing_value(
    name: &str,
    field: &str,
    location: &str,
    diagnostics: &mut Diagnostics,
) -> MatchingRule {
    diagnostics.push(
        Diagnostic::warning(
            MISSING_RULE_VALUE,
            format!("The '{name}' matcher has no '{field}', defaulting to equality"),
        )
        .with_location(field_path(location, field)),
    );
    MatchingRule::Equality
}

/// Advisory checks on an otherwise valid rule.
fn check_rule(rule: &MatchingRule, location: &str, diagnostics: &mut Diagnostics) {
    match rule {
        MatchingRule::Regex { pattern, .. } => {
            // Contract patterns are Java-flavoured; look-around and
            // backreferences do not compile here.
            if let Err(e) = regex::Regex::new(pattern) {
                diagnostics.push(
                    Diagnostic::info(
                        UNCHECKED_REGEX,
                        format!("Regex '{pattern}' could not be checked locally: {e}"),
                    )
                    .with_location(field_path(location, REGEX)),
                );
            }
        }
        MatchingRule::MinMaxType { min, max } if min > max => {
            diagnostics.push(
                Diagnostic::warning(
                    MIN_EXCEEDS_MAX,
                    format!("Minimum {min} is greater than maximum {max}"),
                )
                .with_location(location),
            );
        }
        _ => {}
    }
}

/// A key counts as present only when it holds a non-null value.
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn field_path(location: &str, field: &str) -> String {
    if location.is_empty() {
        field.to_string()
    } else {
        format!("{location}.{field}")
    }
}

fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_or(map: &Map<String, Value>, key: &str, default: &str) -> String {
    present(map, key)
        .map(string_form)
        .unwrap_or_else(|| default.to_string())
}

/// Integer from a native number or a string holding one.
fn coerce_integer(value: &Value, field: &str) -> Result<usize> {
    match value {
        Value::String(s) => s
            .trim()
            .parse::<usize>()
            .map_err(|_| MatchingRuleError::InvalidInteger {
                field: field.to_string(),
                value: s.clone(),
            }),
        Value::Number(_) => strict_integer(value, field),
        other => Err(MatchingRuleError::NotAnInteger {
            field: field.to_string(),
            found: json_type(other).to_string(),
        }),
    }
}

/// Integer from a native number only; strings are rejected.
///
/// Whole-number floats such as `3.0` are accepted.
fn strict_integer(value: &Value, field: &str) -> Result<usize> {
    if !value.is_number() {
        return Err(MatchingRuleError::NotAnInteger {
            field: field.to_string(),
            found: json_type(value).to_string(),
        });
    }

    let whole = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    });

    whole
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| MatchingRuleError::InvalidInteger {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

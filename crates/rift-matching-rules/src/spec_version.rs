//! Contract specification tiers.

use crate::error::MatchingRuleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version of the contract specification a rule set is read from or written to.
///
/// Tiers are ordered; everything below [`SpecVersion::V3`] uses the legacy
/// one-rule-per-path format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum SpecVersion {
    /// Version not stated; treated as legacy
    Unknown,
    V1,
    V1_1,
    V2,
    /// First tier with rule lists and `combine`
    #[default]
    V3,
    V4,
}

impl SpecVersion {
    /// True for tiers that only support a single rule per group.
    pub fn is_legacy(self) -> bool {
        self < SpecVersion::V3
    }

    /// Semantic version string, e.g. `3.0.0`.
    pub fn as_str(self) -> &'static str {
        match self {
            SpecVersion::Unknown => "unknown",
            SpecVersion::V1 => "1.0.0",
            SpecVersion::V1_1 => "1.1.0",
            SpecVersion::V2 => "2.0.0",
            SpecVersion::V3 => "3.0.0",
            SpecVersion::V4 => "4.0",
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecVersion {
    type Err = MatchingRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let version = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        match version {
            "1" | "1.0" | "1.0.0" => Ok(SpecVersion::V1),
            "1.1" | "1.1.0" => Ok(SpecVersion::V1_1),
            "2" | "2.0" | "2.0.0" => Ok(SpecVersion::V2),
            "3" | "3.0" | "3.0.0" => Ok(SpecVersion::V3),
            "4" | "4.0" | "4.0.0" => Ok(SpecVersion::V4),
            "unknown" => Ok(SpecVersion::Unknown),
            _ => Err(MatchingRuleError::InvalidSpecVersion(s.to_string())),
        }
    }
}

impl TryFrom<String> for SpecVersion {
    type Error = MatchingRuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SpecVersion> for String {
    fn from(value: SpecVersion) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_boundary() {
        assert!(SpecVersion::Unknown.is_legacy());
        assert!(SpecVersion::V1.is_legacy());
        assert!(SpecVersion::V1_1.is_legacy());
        assert!(SpecVersion::V2.is_legacy());
        assert!(!SpecVersion::V3.is_legacy());
        assert!(!SpecVersion::V4.is_legacy());
    }

    #[test]
    fn test_parse_versions() {
        assert_eq!("v2".parse::<SpecVersion>().unwrap(), SpecVersion::V2);
        assert_eq!("V3".parse::<SpecVersion>().unwrap(), SpecVersion::V3);
        assert_eq!("1.1.0".parse::<SpecVersion>().unwrap(), SpecVersion::V1_1);
        assert_eq!("4.0".parse::<SpecVersion>().unwrap(), SpecVersion::V4);
        assert_eq!(" 3.0.0 ".parse::<SpecVersion>().unwrap(), SpecVersion::V3);
    }

    #[test]
    fn test_parse_invalid_version() {
        let err = "5".parse::<SpecVersion>().unwrap_err();
        assert_eq!(err, MatchingRuleError::InvalidSpecVersion("5".to_string()));
    }

    #[test]
    fn test_serde_uses_version_string() {
        let json = serde_json::to_string(&SpecVersion::V2).unwrap();
        assert_eq!(json, "\"2.0.0\"");
        let parsed: SpecVersion = serde_json::from_str("\"v3\"").unwrap();
        assert_eq!(parsed, SpecVersion::V3);
    }
}

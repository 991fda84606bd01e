//! Immutable join/leave facts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Whether a fact records a join or a leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    #[serde(rename = "join")]
    Joined,
    #[serde(rename = "leave")]
    Left,
}

impl FactKind {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Joined => "join",
            Self::Left => "leave",
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FactKind {
    type Err = UnknownFactKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join" => Ok(Self::Joined),
            "leave" => Ok(Self::Left),
            _ => Err(UnknownFactKind(s.to_string())),
        }
    }
}

/// Error type for unknown fact kind strings.
#[derive(Debug, Clone)]
pub struct UnknownFactKind(String);

impl fmt::Display for UnknownFactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown fact kind: {}", self.0)
    }
}

impl std::error::Error for UnknownFactKind {}

/// An immutable record of a single join or leave observation.
///
/// The timestamp is already in the reference timezone so that storage,
/// display, and day bucketing all agree on calendar-day boundaries.
/// Facts are created exactly once per observed transition and never
/// mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub user_id: UserId,
    pub username: String,
    pub kind: FactKind,
    pub timestamp: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_kind_roundtrip() {
        for kind in [FactKind::Joined, FactKind::Left] {
            let parsed: FactKind = kind.as_str().parse().expect("should parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_errors() {
        let result: Result<FactKind, _> = "mute".parse();
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "unknown fact kind: mute");
    }

    #[test]
    fn fact_serializes_with_offset_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2024-03-01T09:00:00+07:00").unwrap();
        let fact = Fact {
            user_id: UserId::new("100").unwrap(),
            username: "mhai".into(),
            kind: FactKind::Joined,
            timestamp: ts,
        };
        let json = serde_json::to_string(&fact).unwrap();
        assert!(json.contains("\"join\""));
        assert!(json.contains("+07:00"));
    }
}

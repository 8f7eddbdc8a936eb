//! Context type enum as the single source of truth for context type strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of temporal context categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextType {
    WorkSchedule,
    MoodPattern,
    ResponseStyle,
    Availability,
    FocusTime,
}

impl ContextType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::WorkSchedule,
        Self::MoodPattern,
        Self::ResponseStyle,
        Self::Availability,
        Self::FocusTime,
    ];

    /// String representation used on disk and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WorkSchedule => "work_schedule",
            Self::MoodPattern => "mood_pattern",
            Self::ResponseStyle => "response_style",
            Self::Availability => "availability",
            Self::FocusTime => "focus_time",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = UnknownContextType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| UnknownContextType(s.to_string()))
    }
}

impl Serialize for ContextType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContextType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown context type strings.
#[derive(Debug, Clone)]
pub struct UnknownContextType(String);

impl fmt::Display for UnknownContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown context type: {} (expected one of: work_schedule, mood_pattern, response_style, availability, focus_time)",
            self.0
        )
    }
}

impl std::error::Error for UnknownContextType {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for variant in ContextType::ALL {
            let s = variant.to_string();
            let parsed: ContextType = s.parse().expect("should parse");
            assert_eq!(parsed, variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&ContextType::FocusTime).unwrap();
        assert_eq!(json, "\"focus_time\"");
        let parsed: ContextType = serde_json::from_str("\"mood_pattern\"").unwrap();
        assert_eq!(parsed, ContextType::MoodPattern);
    }

    #[test]
    fn unknown_type_errors() {
        let result: Result<ContextType, _> = "holiday".parse();
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("unknown context type: holiday"));

        let result: Result<ContextType, _> = serde_json::from_str("\"FOCUS_TIME\"");
        assert!(result.is_err());
    }
}

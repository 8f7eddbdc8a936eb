//! Recommendation composition from active contexts.
//!
//! Contexts are applied from the lowest-priority to the highest-priority one,
//! each overwriting the fields it sets, so the first context in resolver
//! order wins every conflict. List fields are replaced whole, never merged.

use std::borrow::Borrow;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::{ContextKind, Mood, Preferences, TemporalContext};

/// Overall tone of the downstream assistant's replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    #[default]
    Normal,
    Professional,
    Concise,
    Inspiring,
    Gentle,
    Casual,
}

impl ResponseStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Professional => "professional",
            Self::Concise => "concise",
            Self::Inspiring => "inspiring",
            Self::Gentle => "gentle",
            Self::Casual => "casual",
        }
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generates a low/medium/high level enum defaulting to medium.
macro_rules! define_level {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            Low,
            #[default]
            Medium,
            High,
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    Self::Low => "low",
                    Self::Medium => "medium",
                    Self::High => "high",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

define_level!(
    /// How formal replies should be.
    FormalityLevel
);

define_level!(
    /// How much detail replies should include.
    DetailLevel
);

/// Merged advisory produced from the active contexts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub response_style: ResponseStyle,
    pub formality_level: FormalityLevel,
    pub detail_level: DetailLevel,
    pub suggested_tools: Vec<String>,
    pub avoid_topics: Vec<String>,
    /// Whether the moment carries time pressure.
    pub time_sensitive: bool,
}

impl Recommendation {
    fn apply_kind(&mut self, kind: &ContextKind) {
        match kind {
            ContextKind::WorkSchedule => {
                self.response_style = ResponseStyle::Professional;
                self.formality_level = FormalityLevel::High;
                self.suggested_tools = strings(&["calendar", "task_manager", "email"]);
                self.time_sensitive = true;
            }
            ContextKind::FocusTime => {
                self.response_style = ResponseStyle::Concise;
                self.detail_level = DetailLevel::Low;
                self.avoid_topics = strings(&["entertainment", "social_media"]);
                self.time_sensitive = true;
            }
            ContextKind::MoodPattern { mood } => match mood {
                Mood::Creative => {
                    self.response_style = ResponseStyle::Inspiring;
                    self.suggested_tools = strings(&["brainstorm", "ideation", "research"]);
                }
                Mood::Tired => {
                    self.response_style = ResponseStyle::Gentle;
                    self.detail_level = DetailLevel::Low;
                }
                Mood::Neutral | Mood::Other(_) => {}
            },
            ContextKind::ResponseStyle | ContextKind::Availability => {}
        }
    }

    /// Overwrites every recognized field named in `preferences`.
    ///
    /// Values that do not parse for their field are skipped.
    fn apply_preferences(&mut self, preferences: &Preferences) {
        for (key, value) in preferences {
            match key.as_str() {
                "response_style" => set_from_value(&mut self.response_style, key, value),
                "formality_level" => set_from_value(&mut self.formality_level, key, value),
                "detail_level" => set_from_value(&mut self.detail_level, key, value),
                "suggested_tools" => set_from_value(&mut self.suggested_tools, key, value),
                "avoid_topics" => set_from_value(&mut self.avoid_topics, key, value),
                "time_sensitive" => set_from_value(&mut self.time_sensitive, key, value),
                _ => tracing::debug!(key = %key, "ignoring unrecognized preference"),
            }
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

fn set_from_value<T: DeserializeOwned>(field: &mut T, key: &str, value: &Value) {
    match T::deserialize(value) {
        Ok(parsed) => *field = parsed,
        Err(e) => tracing::warn!(key, %value, error = %e, "ignoring invalid preference value"),
    }
}

/// Merges the active contexts, given in resolver order, into one recommendation.
///
/// Each context applies its type-specific effects and then its preferences.
/// An empty slice yields [`Recommendation::default`].
pub fn compose<C: Borrow<TemporalContext>>(active_contexts: &[C]) -> Recommendation {
    let mut recommendation = Recommendation::default();
    for context in active_contexts.iter().rev() {
        let context: &TemporalContext = context.borrow();
        recommendation.apply_kind(&context.kind);
        recommendation.apply_preferences(&context.preferences);
    }
    recommendation
}

//! Temporal contexts: named rules pairing a time pattern with a payload.
//!
//! On disk a context carries a free-form `context_data` mapping. In memory
//! that mapping is split into a typed [`ContextKind`] (the signals the
//! composer reads for each context type), the open [`Preferences`] table,
//! and whatever other keys the record carried, which are preserved verbatim.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context_type::ContextType;
use crate::pattern::TimePattern;
use crate::types::{ContextId, ValidationError};

/// Free-form overrides merged over the recommendation.
pub type Preferences = Map<String, Value>;

const MOOD_KEY: &str = "mood";
const PREFERENCES_KEY: &str = "preferences";

/// Default priority for new contexts (1 = highest).
pub const DEFAULT_PRIORITY: u8 = 1;

/// Mood signal carried by `mood_pattern` contexts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mood {
    #[default]
    Neutral,
    Creative,
    Tired,
    /// A mood with no composer effect, kept as written.
    Other(String),
}

impl Mood {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Neutral => "neutral",
            Self::Creative => "creative",
            Self::Tired => "tired",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Mood {
    fn from(s: String) -> Self {
        match s.as_str() {
            "neutral" => Self::Neutral,
            "creative" => Self::Creative,
            "tired" => Self::Tired,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type-specific signals of a context, keyed by context type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKind {
    WorkSchedule,
    MoodPattern { mood: Mood },
    ResponseStyle,
    Availability,
    FocusTime,
}

impl ContextKind {
    pub const fn context_type(&self) -> ContextType {
        match self {
            Self::WorkSchedule => ContextType::WorkSchedule,
            Self::MoodPattern { .. } => ContextType::MoodPattern,
            Self::ResponseStyle => ContextType::ResponseStyle,
            Self::Availability => ContextType::Availability,
            Self::FocusTime => ContextType::FocusTime,
        }
    }
}

impl From<ContextType> for ContextKind {
    fn from(context_type: ContextType) -> Self {
        match context_type {
            ContextType::WorkSchedule => Self::WorkSchedule,
            ContextType::MoodPattern => Self::MoodPattern {
                mood: Mood::Neutral,
            },
            ContextType::ResponseStyle => Self::ResponseStyle,
            ContextType::Availability => Self::Availability,
            ContextType::FocusTime => Self::FocusTime,
        }
    }
}

/// A named rule that is active during the windows its pattern describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ContextRecord", into = "ContextRecord")]
pub struct TemporalContext {
    pub id: ContextId,
    pub name: String,
    pub kind: ContextKind,
    pub time_pattern: TimePattern,
    pub preferences: Preferences,
    /// Context data keys with no typed meaning.
    pub extra: Map<String, Value>,
    /// Inactive contexts are never resolved, whatever their pattern.
    pub active: bool,
    /// Lower value ranks higher.
    pub priority: u8,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

impl TemporalContext {
    /// Creates an active context with default priority and no data.
    pub fn new(
        id: ContextId,
        name: impl Into<String>,
        kind: ContextKind,
        time_pattern: TimePattern,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            time_pattern,
            preferences: Preferences::new(),
            extra: Map::new(),
            active: true,
            priority: DEFAULT_PRIORITY,
            created_at,
            last_used: None,
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub const fn context_type(&self) -> ContextType {
        self.kind.context_type()
    }

    /// Replaces type and data from an untyped `context_data` mapping.
    pub fn set_context_data(
        &mut self,
        context_type: ContextType,
        data: Map<String, Value>,
    ) -> Result<(), ValidationError> {
        let (kind, preferences, extra) = split_context_data(context_type, data)?;
        self.kind = kind;
        self.preferences = preferences;
        self.extra = extra;
        Ok(())
    }

    /// Rebuilds the untyped `context_data` mapping.
    pub fn context_data(&self) -> Map<String, Value> {
        let mut data = self.extra.clone();
        if let ContextKind::MoodPattern { mood } = &self.kind {
            data.insert(MOOD_KEY.to_string(), Value::String(mood.to_string()));
        }
        if !self.preferences.is_empty() {
            data.insert(
                PREFERENCES_KEY.to_string(),
                Value::Object(self.preferences.clone()),
            );
        }
        data
    }
}

fn split_context_data(
    context_type: ContextType,
    mut data: Map<String, Value>,
) -> Result<(ContextKind, Preferences, Map<String, Value>), ValidationError> {
    let preferences = match data.remove(PREFERENCES_KEY) {
        None => Preferences::new(),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(ValidationError::InvalidData {
                key: PREFERENCES_KEY,
                expected: "an object",
            });
        }
    };

    let kind = if context_type == ContextType::MoodPattern {
        let mood = match data.remove(MOOD_KEY) {
            None => Mood::Neutral,
            Some(Value::String(s)) => Mood::from(s),
            Some(_) => {
                return Err(ValidationError::InvalidData {
                    key: MOOD_KEY,
                    expected: "a string",
                });
            }
        };
        ContextKind::MoodPattern { mood }
    } else {
        ContextKind::from(context_type)
    };

    Ok((kind, preferences, data))
}

const fn default_active() -> bool {
    true
}

const fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

/// The stored shape of a context, with untyped `context_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRecord {
    pub id: ContextId,
    pub name: String,
    pub context_type: ContextType,
    #[serde(default)]
    pub time_pattern: TimePattern,
    #[serde(default)]
    pub context_data: Map<String, Value>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default = "default_priority")]
    pub priority: u8,
}

impl TryFrom<ContextRecord> for TemporalContext {
    type Error = ValidationError;

    fn try_from(record: ContextRecord) -> Result<Self, Self::Error> {
        let (kind, preferences, extra) =
            split_context_data(record.context_type, record.context_data)?;
        Ok(Self {
            id: record.id,
            name: record.name,
            kind,
            time_pattern: record.time_pattern,
            preferences,
            extra,
            active: record.active,
            priority: record.priority,
            created_at: record.created_at,
            last_used: record.last_used,
        })
    }
}

impl From<TemporalContext> for ContextRecord {
    fn from(context: TemporalContext) -> Self {
        let context_data = context.context_data();
        Self {
            id: context.id,
            name: context.name,
            context_type: context.kind.context_type(),
            time_pattern: context.time_pattern,
            context_data,
            active: context.active,
            created_at: context.created_at,
            last_used: context.last_used,
            priority: context.priority,
        }
    }
}

//! Example contexts written to a fresh store.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use tctx_core::{ContextId, ContextKind, TemporalContext, TimePattern};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn id(s: &str) -> ContextId {
    ContextId::new(s).expect("default ids are non-empty")
}

/// Work hours, a weekday morning focus block and a relaxed weekend.
pub fn default_contexts(now: DateTime<Utc>) -> Vec<TemporalContext> {
    let mut work = TemporalContext::new(
        id("work_hours"),
        "Work Schedule",
        ContextKind::WorkSchedule,
        TimePattern {
            days_of_week: Some(vec![1, 2, 3, 4, 5]),
            hour_range: Some((9, 17)),
            ..TimePattern::default()
        },
        now,
    )
    .with_preferences(object(json!({
        "response_style": "professional",
        "formality_level": "high",
        "detail_level": "high"
    })));
    work.extra = object(json!({
        "suggested_tools": ["calendar", "email", "tasks"],
        "avoid_topics": ["entertainment", "personal"]
    }));

    let mut focus = TemporalContext::new(
        id("focus_morning"),
        "Morning Focus Time",
        ContextKind::FocusTime,
        TimePattern {
            days_of_week: Some(vec![1, 2, 3, 4, 5]),
            hour_range: Some((8, 11)),
            ..TimePattern::default()
        },
        now,
    )
    .with_preferences(object(json!({
        "response_style": "concise",
        "detail_level": "medium"
    })));
    focus.extra = object(json!({
        "avoid_interruptions": true,
        "quick_responses_preferred": true
    }));

    let mut weekend = TemporalContext::new(
        id("weekend_casual"),
        "Relaxed Weekend",
        ContextKind::ResponseStyle,
        TimePattern {
            days_of_week: Some(vec![0, 6]),
            ..TimePattern::default()
        },
        now,
    )
    .with_preferences(object(json!({
        "response_style": "casual",
        "formality_level": "low",
        "detail_level": "medium"
    })));
    weekend.extra = object(json!({
        "encourage_creativity": true,
        "suggested_topics": ["hobbies", "entertainment", "learning"]
    }));

    vec![work, focus, weekend]
}

//! Current command: contexts active right now and their recommendation.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use tctx_core::{ContextId, evaluate};
use tctx_store::ContextStore;

use super::render;
use super::util::format_instant;

/// Reports the contexts active at `now` and marks each of them as used.
pub fn run<W: Write>(
    writer: &mut W,
    store: &mut ContextStore,
    now: DateTime<FixedOffset>,
    json: bool,
) -> Result<()> {
    let report = evaluate(store.contexts(), &now);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(
            writer,
            "Current temporal context ({})",
            format_instant(&report.timestamp)
        )?;
        writeln!(writer)?;
        writeln!(writer, "Active contexts: {}", report.current_contexts.len())?;
        render::write_contexts(writer, &report.current_contexts)?;
        writeln!(writer)?;
        writeln!(writer, "Recommendations:")?;
        render::write_recommendation(writer, &report.recommendations)?;
    }

    let used: Vec<ContextId> = report
        .current_contexts
        .iter()
        .map(|context| context.id.clone())
        .collect();
    let used_at = now.with_timezone(&Utc);
    for id in &used {
        store.mark_used(id, used_at)?;
    }
    tracing::debug!(count = used.len(), "marked contexts as used");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use insta::assert_snapshot;
    use serde_json::{Value, json};
    use tctx_core::{ContextKind, TemporalContext, TimePattern};

    fn tuesday_ten() -> DateTime<FixedOffset> {
        // 2026-03-03 is a Tuesday.
        Utc.with_ymd_and_hms(2026, 3, 3, 10, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    fn seeded_store(path: &std::path::Path) -> ContextStore {
        std::fs::write(path, "[]").unwrap();
        let mut store = ContextStore::open(path).unwrap();
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        let office = TemporalContext::new(
            ContextId::new("office").unwrap(),
            "Office hours",
            ContextKind::WorkSchedule,
            TimePattern {
                days_of_week: Some(vec![1, 2, 3, 4, 5]),
                hour_range: Some((9, 17)),
                ..TimePattern::default()
            },
            created,
        )
        .with_priority(2);
        store.insert(office).unwrap();

        let Value::Object(preferences) = json!({"response_style": "casual"}) else {
            unreachable!()
        };
        let focus = TemporalContext::new(
            ContextId::new("focus").unwrap(),
            "Morning focus",
            ContextKind::FocusTime,
            TimePattern {
                hour_range: Some((8, 11)),
                ..TimePattern::default()
            },
            created,
        )
        .with_preferences(preferences);
        store.insert(focus).unwrap();

        store
    }

    #[test]
    fn current_reports_and_marks_used() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("contexts.json");
        let mut store = seeded_store(&path);

        let mut output = Vec::new();
        run(&mut output, &mut store, tuesday_ten(), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output);

        let reopened = ContextStore::open(&path).unwrap();
        for context in reopened.contexts() {
            assert_eq!(context.last_used, Some(tuesday_ten().with_timezone(&Utc)));
        }
    }

    #[test]
    fn current_json_output() {
        let temp = tempfile::tempdir().unwrap();
        let mut store = seeded_store(&temp.path().join("contexts.json"));

        let mut output = Vec::new();
        run(&mut output, &mut store, tuesday_ten(), true).unwrap();

        let value: Value = serde_json::from_slice(&output).unwrap();
        let timestamp = value["timestamp"].as_str().unwrap();
        assert_eq!(
            DateTime::parse_from_rfc3339(timestamp).unwrap(),
            tuesday_ten()
        );
        let ids: Vec<&str> = value["current_contexts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["focus", "office"]);
        assert_eq!(value["recommendations"]["response_style"], "casual");
        assert_eq!(value["recommendations"]["formality_level"], "high");
        assert_eq!(value["recommendations"]["detail_level"], "low");
    }

    #[test]
    fn nothing_active_marks_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("contexts.json");
        let mut store = seeded_store(&path);
        let sunday_night = Utc
            .with_ymd_and_hms(2026, 3, 8, 23, 0, 0)
            .unwrap()
            .fixed_offset();

        let mut output = Vec::new();
        run(&mut output, &mut store, sunday_night, false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Active contexts: 0"));
        assert!(output.contains("- Response style:  normal"));
        assert!(store.contexts().iter().all(|c| c.last_used.is_none()));
    }
}

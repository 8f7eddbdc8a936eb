//! Active-context resolution.

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;

use crate::context::TemporalContext;
use crate::recommendation::{Recommendation, compose};

/// Returns the active contexts whose pattern matches `instant`.
///
/// The result is ordered by ascending priority (highest priority first).
/// Contexts with equal priority keep their input order.
pub fn resolve_active<'a, Tz: TimeZone>(
    contexts: &'a [TemporalContext],
    instant: &DateTime<Tz>,
) -> Vec<&'a TemporalContext> {
    let mut active: Vec<&TemporalContext> = contexts
        .iter()
        .filter(|context| context.active)
        .filter(|context| context.time_pattern.matches(instant))
        .collect();
    // sort_by_key is stable
    active.sort_by_key(|context| context.priority);
    active
}

/// Active contexts at a moment together with their merged recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct ContextReport<'a> {
    pub timestamp: DateTime<FixedOffset>,
    pub current_contexts: Vec<&'a TemporalContext>,
    pub recommendations: Recommendation,
}

/// Resolves and composes in one step.
///
/// Marking the resolved contexts as used is left to the caller.
pub fn evaluate<'a, Tz: TimeZone>(
    contexts: &'a [TemporalContext],
    instant: &DateTime<Tz>,
) -> ContextReport<'a> {
    let current_contexts = resolve_active(contexts, instant);
    let recommendations = compose(&current_contexts);
    tracing::debug!(
        active = current_contexts.len(),
        total = contexts.len(),
        "resolved temporal contexts"
    );
    ContextReport {
        timestamp: instant.fixed_offset(),
        current_contexts,
        recommendations,
    }
}

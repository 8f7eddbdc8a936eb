//! Preview command: which contexts would be active at a given moment.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use tctx_core::evaluate;
use tctx_store::ContextStore;

use super::render;
use super::util::format_instant;
use crate::zone::Zone;

/// Reports the contexts that would be active at `at` without touching the store.
pub fn run<W: Write>(
    writer: &mut W,
    store: &ContextStore,
    at: DateTime<FixedOffset>,
    zone: Zone,
    json: bool,
) -> Result<()> {
    let report = evaluate(store.contexts(), &at);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(writer, "Context preview")?;
    writeln!(writer, "Date/time: {}", format_instant(&report.timestamp))?;
    writeln!(writer, "Timezone:  {zone}")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Contexts that would be active: {}",
        report.current_contexts.len()
    )?;

    if report.current_contexts.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "No active contexts at this time")?;
        return Ok(());
    }

    render::write_contexts(writer, &report.current_contexts)?;
    writeln!(writer)?;
    writeln!(writer, "Recommendations that would apply:")?;
    render::write_recommendation(writer, &report.recommendations)?;
    Ok(())
}

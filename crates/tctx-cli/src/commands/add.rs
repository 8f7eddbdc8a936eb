//! Add command for creating temporal contexts.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use tctx_core::{ContextId, ContextKind, ContextType, TemporalContext, TimePattern};
use tctx_store::{ContextStore, generate_id};

use super::util::parse_json_object;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Descriptive name for the context.
    #[arg(long)]
    pub name: String,

    /// Context type: work_schedule, mood_pattern, response_style, availability or focus_time.
    #[arg(long = "type", value_name = "TYPE")]
    pub context_type: ContextType,

    /// Unique ID (a random one is generated when omitted).
    #[arg(long)]
    pub id: Option<String>,

    /// Time pattern as JSON, e.g. '{"days_of_week":[1,2,3,4,5],"hour_range":[9,17]}'.
    /// Omit for a context that is always active.
    #[arg(long, value_name = "JSON")]
    pub pattern: Option<String>,

    /// Context data as JSON, e.g. '{"mood":"creative","preferences":{"detail_level":"high"}}'.
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// Priority (1 ranks highest).
    #[arg(long, default_value_t = 1)]
    pub priority: u8,
}

pub fn run<W: Write>(
    writer: &mut W,
    store: &mut ContextStore,
    args: &AddArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let id = match &args.id {
        Some(id) => ContextId::new(id.as_str())?,
        None => generate_id(),
    };
    let time_pattern: TimePattern = match &args.pattern {
        Some(json) => serde_json::from_str(json).context("invalid pattern JSON")?,
        None => TimePattern::default(),
    };

    let mut context = TemporalContext::new(
        id,
        args.name.trim(),
        ContextKind::from(args.context_type),
        time_pattern,
        now,
    )
    .with_priority(args.priority);
    if let Some(json) = &args.data {
        context.set_context_data(args.context_type, parse_json_object(json, "data")?)?;
    }

    let summary = format!("Added context '{}' ({})", context.name, context.id);
    let pattern = context.time_pattern.to_string();
    store.insert(context)?;

    writeln!(writer, "{summary}")?;
    writeln!(writer, "Pattern: {pattern}")?;
    Ok(())
}

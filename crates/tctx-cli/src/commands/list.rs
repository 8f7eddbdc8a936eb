//! List command for showing stored contexts.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use clap::Args;
use tctx_core::{ContextType, TemporalContext};
use tctx_store::{ContextFilter, ContextStore};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show contexts of this type.
    #[arg(long = "type", value_name = "TYPE")]
    pub context_type: Option<ContextType>,

    /// Only show enabled contexts whose pattern matches right now.
    #[arg(long)]
    pub active_only: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Lists contexts in store order. Timestamps are shown in the offset of `now`.
pub fn run<W: Write>(
    writer: &mut W,
    store: &ContextStore,
    args: &ListArgs,
    now: DateTime<FixedOffset>,
) -> Result<()> {
    let filter = ContextFilter {
        context_type: args.context_type,
        active: args.active_only.then_some(true),
    };
    let mut contexts = store.find(filter);
    if args.active_only {
        contexts.retain(|context| context.time_pattern.matches(&now));
    }

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&contexts)?)?;
        return Ok(());
    }

    writeln!(writer, "Temporal contexts ({} found)", contexts.len())?;
    if contexts.is_empty() {
        writeln!(writer)?;
        writeln!(
            writer,
            "Add one with: tctx add --name <NAME> --type <TYPE> --pattern <JSON>"
        )?;
        return Ok(());
    }

    for context in contexts {
        writeln!(writer)?;
        write_context(writer, context, &now.timezone())?;
    }
    Ok(())
}

fn write_context<W: Write>(
    writer: &mut W,
    context: &TemporalContext,
    offset: &FixedOffset,
) -> Result<()> {
    let status = if context.active { "active" } else { "inactive" };
    let last_used = context.last_used.map_or_else(
        || "Never".to_string(),
        |at| at.with_timezone(offset).format("%Y-%m-%d %H:%M").to_string(),
    );
    let settings = context.context_data().len();
    let plural = if settings == 1 { "" } else { "s" };

    writeln!(writer, "{} ({})", context.name, context.id)?;
    writeln!(writer, "  {:<11}{}", "Type:", context.context_type())?;
    writeln!(writer, "  {:<11}{status}", "Status:")?;
    writeln!(writer, "  {:<11}{}", "Pattern:", context.time_pattern)?;
    writeln!(writer, "  {:<11}{}", "Priority:", context.priority)?;
    writeln!(writer, "  {:<11}{last_used}", "Last used:")?;
    writeln!(writer, "  {:<11}{settings} setting{plural}", "Data:")?;
    Ok(())
}

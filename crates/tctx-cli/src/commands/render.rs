//! Text rendering shared by `current` and `preview`.

use std::io::{self, Write};

use tctx_core::{Recommendation, TemporalContext};

/// Writes one block per context, each preceded by a blank line.
pub fn write_contexts<W: Write>(writer: &mut W, contexts: &[&TemporalContext]) -> io::Result<()> {
    for context in contexts {
        writeln!(writer)?;
        writeln!(writer, "- {} ({})", context.name, context.context_type())?;
        writeln!(writer, "  {:<10}{}", "Pattern:", context.time_pattern)?;
        writeln!(writer, "  {:<10}{}", "Priority:", context.priority)?;
    }
    Ok(())
}

pub fn write_recommendation<W: Write>(
    writer: &mut W,
    recommendation: &Recommendation,
) -> io::Result<()> {
    let time_sensitive = if recommendation.time_sensitive {
        "yes"
    } else {
        "no"
    };
    field(writer, "Response style:", recommendation.response_style)?;
    field(writer, "Formality level:", recommendation.formality_level)?;
    field(writer, "Detail level:", recommendation.detail_level)?;
    field(writer, "Time sensitive:", time_sensitive)?;
    if !recommendation.suggested_tools.is_empty() {
        field(
            writer,
            "Suggested tools:",
            recommendation.suggested_tools.join(", "),
        )?;
    }
    if !recommendation.avoid_topics.is_empty() {
        field(writer, "Avoid topics:", recommendation.avoid_topics.join(", "))?;
    }
    Ok(())
}

fn field<W: Write>(writer: &mut W, label: &str, value: impl std::fmt::Display) -> io::Result<()> {
    writeln!(writer, "- {label:<17}{value}")
}

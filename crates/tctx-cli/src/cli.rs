//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add::AddArgs;
use crate::commands::list::ListArgs;
use crate::commands::update::UpdateArgs;

/// Time-aware response recommendations.
///
/// Stores named temporal contexts (work hours, focus blocks, moods) with the
/// times they apply, and reports which are active and how replies should be
/// shaped as a result.
#[derive(Debug, Parser)]
#[command(name = "tctx", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Time zone to evaluate in (IANA name or 'local'). Overrides the config.
    #[arg(long, global = true, value_name = "TZ")]
    pub timezone: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the contexts active now and the resulting recommendations.
    Current {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Preview which contexts would be active at a given time.
    Preview {
        /// When to evaluate: ISO 8601 (e.g., 2026-01-15T10:30) or relative
        /// (e.g., '2 hours ago', 'in 3 days'). Defaults to now.
        #[arg(long)]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a new temporal context.
    Add(AddArgs),

    /// List stored contexts.
    List(ListArgs),

    /// Update fields of an existing context.
    Update(UpdateArgs),

    /// Delete a context.
    Delete {
        /// ID of the context to delete.
        id: String,
    },
}

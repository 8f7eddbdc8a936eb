//! Update command for editing an existing context.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;
use tctx_core::{ContextId, ContextType, TimePattern};
use tctx_store::{ContextPatch, ContextStore};

use super::util::parse_json_object;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// ID of the context to update.
    pub id: String,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New context type. Existing context data is reinterpreted for it.
    #[arg(long = "type", value_name = "TYPE")]
    pub context_type: Option<ContextType>,

    /// Replacement time pattern as JSON.
    #[arg(long, value_name = "JSON")]
    pub pattern: Option<String>,

    /// Replacement context data as JSON.
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// New priority (1 ranks highest).
    #[arg(long)]
    pub priority: Option<u8>,

    /// Enable or disable the context.
    #[arg(long, value_name = "BOOL")]
    pub active: Option<bool>,
}

impl UpdateArgs {
    fn to_patch(&self) -> Result<ContextPatch> {
        let time_pattern = self
            .pattern
            .as_deref()
            .map(serde_json::from_str::<TimePattern>)
            .transpose()
            .context("invalid pattern JSON")?;
        let context_data = self
            .data
            .as_deref()
            .map(|json| parse_json_object(json, "data"))
            .transpose()?;

        Ok(ContextPatch {
            name: self.name.as_ref().map(|name| name.trim().to_string()),
            context_type: self.context_type,
            context_data,
            time_pattern,
            active: self.active,
            priority: self.priority,
        })
    }
}

pub fn run<W: Write>(writer: &mut W, store: &mut ContextStore, args: &UpdateArgs) -> Result<()> {
    let patch = args.to_patch()?;
    if patch == ContextPatch::default() {
        bail!(
            "nothing to update: pass at least one of --name, --type, --pattern, --data, --priority or --active"
        );
    }

    let id = ContextId::new(args.id.as_str())?;
    let updated = store.update(&id, patch)?;
    writeln!(writer, "Updated context '{}' ({})", updated.name, updated.id)?;
    Ok(())
}

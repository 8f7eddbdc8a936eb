//! Delete command.

use std::io::Write;

use anyhow::Result;
use tctx_core::ContextId;
use tctx_store::ContextStore;

pub fn run<W: Write>(writer: &mut W, store: &mut ContextStore, id: &str) -> Result<()> {
    let id = ContextId::new(id)?;
    let removed = store.delete(&id)?;
    writeln!(writer, "Deleted context '{}' ({})", removed.name, removed.id)?;
    Ok(())
}

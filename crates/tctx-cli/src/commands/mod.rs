//! CLI subcommand implementations.

pub mod add;
pub mod current;
pub mod delete;
pub mod list;
pub mod preview;
mod render;
pub mod update;
pub mod util;

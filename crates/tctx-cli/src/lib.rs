//! Temporal context CLI library.
//!
//! This crate provides the `tctx` command-line interface over the context
//! store: inspecting the active contexts and managing stored ones.

mod cli;
pub mod commands;
mod config;
mod zone;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use zone::Zone;

//! Core domain logic for temporal contexts.
//!
//! This crate contains the fundamental types and logic for:
//! - Time patterns: declarative schedules and the matcher that evaluates them
//! - Resolution: picking the active contexts for a moment, by priority
//! - Composition: merging active contexts into one recommendation
//!
//! Everything here is pure; persistence lives in `tctx-store`.

pub mod context;
pub mod context_type;
mod cron_expr;
pub mod pattern;
pub mod recommendation;
mod resolve;
pub mod types;

pub use context::{ContextKind, ContextRecord, Mood, Preferences, TemporalContext};
pub use context_type::{ContextType, UnknownContextType};
pub use pattern::{TimePattern, matches};
pub use recommendation::{DetailLevel, FormalityLevel, Recommendation, ResponseStyle, compose};
pub use resolve::{ContextReport, evaluate, resolve_active};
pub use types::{ContextId, ValidationError};

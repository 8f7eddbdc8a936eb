//! Storage layer for temporal contexts.
//!
//! Contexts live in a single JSON file holding an array of context records.
//! The whole list is loaded on open and kept in memory; every mutation
//! rewrites the file.
//!
//! # Concurrency
//!
//! A [`ContextStore`] assumes it is the only writer of its file. There is no
//! locking between processes. Writes go to a temporary file in the same
//! directory which is then renamed over the original, so a reader never sees
//! a half-written file.
//!
//! # File Format
//!
//! Each record has the shape of [`tctx_core::ContextRecord`]: `id`, `name`,
//! `context_type`, `time_pattern`, `context_data`, `active`, `priority`,
//! `created_at` and `last_used`, with timestamps in RFC 3339.

mod defaults;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tctx_core::{ContextId, ContextType, TemporalContext, TimePattern, ValidationError};
use thiserror::Error;
use uuid::Uuid;

pub use defaults::default_contexts;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the contexts file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The contexts file is not a valid list of contexts.
    #[error("invalid contexts file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Serializing contexts failed.
    #[error("failed to serialize contexts: {0}")]
    Serialize(#[from] serde_json::Error),
    /// A context with this ID already exists.
    #[error("a context with id '{0}' already exists")]
    DuplicateId(ContextId),
    /// No context has this ID.
    #[error("context not found: {0}")]
    NotFound(ContextId),
    /// The context failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Filter for [`ContextStore::find`]. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextFilter {
    pub context_type: Option<ContextType>,
    pub active: Option<bool>,
}

/// Partial update for [`ContextStore::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextPatch {
    pub name: Option<String>,
    pub context_type: Option<ContextType>,
    /// Replaces the whole `context_data` mapping.
    pub context_data: Option<Map<String, Value>>,
    pub time_pattern: Option<TimePattern>,
    pub active: Option<bool>,
    pub priority: Option<u8>,
}

/// Whether [`ContextStore::save`] added or replaced a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Replaced,
}

/// File-backed list of temporal contexts.
#[derive(Debug)]
pub struct ContextStore {
    /// `None` for in-memory stores.
    path: Option<PathBuf>,
    contexts: Vec<TemporalContext>,
}

impl ContextStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is created with the [default contexts](default_contexts).
    /// A file that exists but does not parse is an error and is left untouched.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let contexts: Vec<TemporalContext> =
                    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                tracing::debug!(count = contexts.len(), path = %path.display(), "loaded contexts");
                Ok(Self {
                    path: Some(path.to_path_buf()),
                    contexts,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let store = Self {
                    path: Some(path.to_path_buf()),
                    contexts: default_contexts(Utc::now()),
                };
                store.write(&store.contexts)?;
                tracing::info!(path = %path.display(), "created contexts file with defaults");
                Ok(store)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Creates an empty store that never touches disk.
    ///
    /// Useful for testing.
    pub const fn in_memory() -> Self {
        Self {
            path: None,
            contexts: Vec::new(),
        }
    }

    /// Returns the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All contexts in store order.
    pub fn contexts(&self) -> &[TemporalContext] {
        &self.contexts
    }

    /// Contexts matching `filter`, in store order.
    pub fn find(&self, filter: ContextFilter) -> Vec<&TemporalContext> {
        self.contexts
            .iter()
            .filter(|c| filter.context_type.is_none_or(|t| c.context_type() == t))
            .filter(|c| filter.active.is_none_or(|a| c.active == a))
            .collect()
    }

    pub fn find_by_id(&self, id: &ContextId) -> Option<&TemporalContext> {
        self.contexts.iter().find(|c| &c.id == id)
    }

    /// Adds a new context; fails if its ID is taken.
    pub fn insert(&mut self, context: TemporalContext) -> Result<(), StoreError> {
        validate(&context)?;
        if self.position(&context.id).is_some() {
            return Err(StoreError::DuplicateId(context.id));
        }
        let mut contexts = self.contexts.clone();
        contexts.push(context);
        self.commit(contexts)
    }

    /// Adds or replaces a context by ID.
    ///
    /// A replaced context keeps its original `created_at` and `last_used`.
    pub fn save(&mut self, mut context: TemporalContext) -> Result<SaveOutcome, StoreError> {
        validate(&context)?;
        let mut contexts = self.contexts.clone();
        let outcome = if let Some(index) = self.position(&context.id) {
            let existing = &self.contexts[index];
            context.created_at = existing.created_at;
            context.last_used = existing.last_used;
            contexts[index] = context;
            SaveOutcome::Replaced
        } else {
            contexts.push(context);
            SaveOutcome::Inserted
        };
        self.commit(contexts)?;
        Ok(outcome)
    }

    /// Applies a partial update and returns the updated context.
    ///
    /// Changing only the type reinterprets the existing `context_data`.
    pub fn update(
        &mut self,
        id: &ContextId,
        patch: ContextPatch,
    ) -> Result<&TemporalContext, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut updated = self.contexts[index].clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if patch.context_type.is_some() || patch.context_data.is_some() {
            let context_type = patch.context_type.unwrap_or_else(|| updated.context_type());
            let data = patch
                .context_data
                .unwrap_or_else(|| updated.context_data());
            updated.set_context_data(context_type, data)?;
        }
        if let Some(time_pattern) = patch.time_pattern {
            updated.time_pattern = time_pattern;
        }
        if let Some(active) = patch.active {
            updated.active = active;
        }
        if let Some(priority) = patch.priority {
            updated.priority = priority;
        }
        validate(&updated)?;

        let mut contexts = self.contexts.clone();
        contexts[index] = updated;
        self.commit(contexts)?;
        Ok(&self.contexts[index])
    }

    /// Removes a context and returns it.
    pub fn delete(&mut self, id: &ContextId) -> Result<TemporalContext, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let mut contexts = self.contexts.clone();
        let removed = contexts.remove(index);
        self.commit(contexts)?;
        Ok(removed)
    }

    /// Records that a context was active at `at`.
    pub fn mark_used(&mut self, id: &ContextId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let mut contexts = self.contexts.clone();
        contexts[index].last_used = Some(at);
        self.commit(contexts)
    }

    fn position(&self, id: &ContextId) -> Option<usize> {
        self.contexts.iter().position(|c| &c.id == id)
    }

    /// Writes `contexts` and only then makes them the current list, so a
    /// failed write leaves the store as it was.
    fn commit(&mut self, contexts: Vec<TemporalContext>) -> Result<(), StoreError> {
        self.write(&contexts)?;
        self.contexts = contexts;
        Ok(())
    }

    /// Rewrites the backing file, if any.
    fn write(&self, contexts: &[TemporalContext]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, contexts)?;
        file.write_all(b"\n")?;
        file.persist(path).map_err(|e| StoreError::Io(e.error))?;
        tracing::debug!(count = contexts.len(), path = %path.display(), "saved contexts");
        Ok(())
    }
}

/// Generates a fresh random context ID.
pub fn generate_id() -> ContextId {
    ContextId::new(Uuid::new_v4().to_string()).expect("UUIDs are never empty")
}

fn validate(context: &TemporalContext) -> Result<(), ValidationError> {
    if context.name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    context.time_pattern.validate()
}

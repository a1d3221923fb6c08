//! In-memory progress storage for testing.
//!
//! This module provides a thread-safe in-memory implementation of the
//! ProgressStore trait, primarily for command tests.

use std::sync::RwLock;

use chrono::Utc;

use crate::core::ProgressRecord;
use crate::error::{ProgressError, Result};
use crate::storage::codec::decode_record;
use crate::storage::ProgressStore;

/// What the store currently holds.
#[derive(Debug, Clone, Default)]
enum Slot {
    /// Nothing saved yet.
    #[default]
    Empty,
    /// A saved record.
    Record(ProgressRecord),
    /// Raw file content that has not been decoded yet.
    Raw(String),
}

/// In-memory progress store for testing.
///
/// Thread-safe implementation using `RwLock`. The record is lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    slot: RwLock<Slot>,
}

impl MemoryProgressStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `record`.
    pub fn with_record(record: ProgressRecord) -> Self {
        Self {
            slot: RwLock::new(Slot::Record(record)),
        }
    }

    /// Create a store holding raw JSON, decoded on load like a file would be.
    pub fn with_raw(content: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Slot::Raw(content.into())),
        }
    }

    /// The stored record without defaulting, if one has been saved.
    pub fn snapshot(&self) -> Option<ProgressRecord> {
        match &*self.slot.read().unwrap() {
            Slot::Record(record) => Some(record.clone()),
            _ => None,
        }
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<ProgressRecord> {
        match &*self.slot.read().unwrap() {
            Slot::Empty => Ok(ProgressRecord::new()),
            Slot::Record(record) => Ok(record.clone()),
            Slot::Raw(content) => decode_record(content, ProgressRecord::new())
                .map_err(|m| ProgressError::format(self.location(), m)),
        }
    }

    fn save(&self, record: &mut ProgressRecord) -> Result<()> {
        record.stamp(Utc::now());
        *self.slot.write().unwrap() = Slot::Record(record.clone());
        Ok(())
    }

    fn exists(&self) -> Result<bool> {
        Ok(!matches!(*self.slot.read().unwrap(), Slot::Empty))
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

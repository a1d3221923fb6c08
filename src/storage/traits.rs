//! Progress storage traits.
//!
//! This module defines the `ProgressStore` trait for record persistence.

use std::sync::Arc;

use crate::core::ProgressRecord;
use crate::error::Result;

/// Trait for progress storage backends.
///
/// A store holds at most one record. It never applies progress rules; callers
/// load a record, transform it, and hand it back to `save`.
pub trait ProgressStore: Send + Sync {
    /// Load the stored record.
    ///
    /// Returns a fresh record when nothing has been stored yet.
    fn load(&self) -> Result<ProgressRecord>;

    /// Persist a record, stamping its `updated_at` with the current time.
    fn save(&self, record: &mut ProgressRecord) -> Result<()>;

    /// Check whether a record has been stored.
    fn exists(&self) -> Result<bool>;

    /// Human-readable location of the stored record.
    fn location(&self) -> String;
}

/// Blanket implementation of ProgressStore for Arc-wrapped stores.
///
/// This allows sharing one store between tests and commands.
impl<T: ProgressStore + ?Sized> ProgressStore for Arc<T> {
    fn load(&self) -> Result<ProgressRecord> {
        (**self).load()
    }

    fn save(&self, record: &mut ProgressRecord) -> Result<()> {
        (**self).save(record)
    }

    fn exists(&self) -> Result<bool> {
        (**self).exists()
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Test utilities for ProgressStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;

    /// Test helper to verify ProgressStore implementations.
    pub fn test_progress_store_round_trip<S: ProgressStore>(store: &S) {
        // Nothing stored yet: a fresh record comes back
        assert!(!store.exists().unwrap());
        let fresh = store.load().unwrap();
        assert_eq!(fresh.xp, 0);
        assert!(fresh.completed_modules.is_empty());
        assert_eq!(fresh.streak_days, 0);

        // Save a modified record
        let mut record = fresh;
        record.xp = 300;
        record.streak_days = 3;
        record.completed_modules = vec!["A".to_string(), "B".to_string()];
        record.updated_at = "2000-01-01T00:00:00Z".to_string();
        store.save(&mut record).unwrap();

        // Save stamps updated_at
        assert_ne!(record.updated_at, "2000-01-01T00:00:00Z");
        assert!(record.updated_at_time().is_some());

        // Load reproduces the saved record, stamp included
        assert!(store.exists().unwrap());
        let loaded = store.load().unwrap();
        assert_eq!(loaded, record);

        // Saving again replaces the record
        let mut updated = loaded;
        updated.xp = 400;
        store.save(&mut updated).unwrap();
        assert_eq!(store.load().unwrap().xp, 400);
    }
}

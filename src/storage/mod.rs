//! Progress storage for QuantAcademy.
//!
//! This module persists the progress record, with an atomic file-based
//! backend and an in-memory backend for tests.

pub mod codec;
pub mod file;
pub mod memory;
pub mod traits;

pub use file::{load, resolve_path, save, stage, FileProgressStore, StagedWrite};
pub use memory::MemoryProgressStore;
pub use traits::ProgressStore;

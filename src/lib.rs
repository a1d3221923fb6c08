//! QuantAcademy - durable local learning progress.
//!
//! Tracks one user's XP, completed modules, and daily streak, and persists
//! them to `~/.quantacademy/progress.json` with atomic replace-on-write.
//! Callers load a record, run it through the progress rules, and save it
//! back; no state is held between calls.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;

pub use config::Config;
pub use core::{
    complete_module, complete_module_on, touch_activity, touch_activity_on, validate,
    ProgressRecord, StreakTransition, ValidationIssue, ValidationReport, DEFAULT_XP_PER_MODULE,
    MODULES,
};
pub use error::{ProgressError, Result};
pub use storage::{
    load, resolve_path, save, FileProgressStore, MemoryProgressStore, ProgressStore, StagedWrite,
};

// CLI commands
pub use cli::{CompleteCommand, ModulesCommand, StatusCommand, TouchCommand, ValidateCommand};

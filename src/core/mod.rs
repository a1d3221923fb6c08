//! Core types and rules for QuantAcademy progress.
//!
//! This module contains the persisted record, the streak and completion
//! rules that operate on it, the invariant validator, and the curriculum.

pub mod catalog;
pub mod record;
pub mod rules;
pub mod validate;

pub use catalog::{catalog_completed, is_catalog_module, next_module, MODULES};
pub use record::{format_date, format_timestamp, parse_date, parse_timestamp, today, ProgressRecord};
pub use rules::{
    complete_module, complete_module_on, touch_activity, touch_activity_on, StreakTransition,
    DEFAULT_XP_PER_MODULE,
};
pub use validate::{validate, ValidationIssue, ValidationReport};

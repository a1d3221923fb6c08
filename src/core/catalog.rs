//! The QuantAcademy curriculum.

use crate::core::record::ProgressRecord;

/// Modules offered by the curriculum, in teaching order.
pub const MODULES: &[&str] = &[
    "Module 1: Python Foundations",
    "Module 2: Technical Analysis",
    "Module 3: Statistical Analysis",
    "Module 4: Backtesting",
    "Module 5: Risk Management",
    "Module 6: Machine Learning",
    "Module 7: Deep Learning",
    "Module 8: NLP",
    "Module 9: LLM Trading",
    "Module 10: Multi-Agent Systems",
];

/// Whether `name` (after trimming) is a curriculum module.
pub fn is_catalog_module(name: &str) -> bool {
    MODULES.contains(&name.trim())
}

/// Number of curriculum modules the record has completed.
///
/// Identifiers outside the curriculum are not counted.
pub fn catalog_completed(record: &ProgressRecord) -> usize {
    MODULES.iter().filter(|m| record.has_completed(m)).count()
}

/// The first curriculum module not yet completed.
pub fn next_module(record: &ProgressRecord) -> Option<&'static str> {
    MODULES.iter().copied().find(|m| !record.has_completed(m))
}

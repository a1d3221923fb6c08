//! Status command.
//!
//! Shows streak, XP, and curriculum completion. Read-only: a malformed
//! progress file is reported and replaced by a fresh record for display,
//! but nothing is written back.

use serde::{Deserialize, Serialize};

use crate::core::{catalog_completed, next_module, validate, ProgressRecord, MODULES};
use crate::error::FailOpen;
use crate::storage::ProgressStore;

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Where the record is stored.
    pub location: String,
    /// Current streak in days.
    pub streak_days: i64,
    /// Total XP.
    pub xp: i64,
    /// Last active date.
    pub last_active_date: String,
    /// Curriculum modules completed.
    pub catalog_completed: usize,
    /// Curriculum size.
    pub catalog_total: usize,
    /// Every completed module, in completion order.
    pub completed_modules: Vec<String>,
    /// The next curriculum module to take.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_module: Option<String>,
    /// Validation issues found in the stored record.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub issues: Vec<String>,
    /// True when the stored file could not be read and defaults are shown.
    pub recovered: bool,
}

impl StatusOutput {
    fn from_record(location: String, record: &ProgressRecord, recovered: bool) -> Self {
        Self {
            success: true,
            location,
            streak_days: record.streak_days,
            xp: record.xp,
            last_active_date: record.last_active_date.clone(),
            catalog_completed: catalog_completed(record),
            catalog_total: MODULES.len(),
            completed_modules: record.completed_modules.clone(),
            next_module: next_module(record).map(str::to_string),
            issues: validate(record).messages(),
            recovered,
        }
    }
}

/// The status command implementation.
pub struct StatusCommand<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> StatusCommand<S> {
    /// Create a new status command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the status command.
    pub fn run(&self, _options: &StatusOptions) -> StatusOutput {
        let mut recovered = false;
        let record = self.store.load().fail_open_else("loading progress", || {
            recovered = true;
            ProgressRecord::new()
        });
        StatusOutput::from_record(self.store.location(), &record, recovered)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    /// Format output as human-readable text.
    fn format_human_readable(&self, output: &StatusOutput) -> String {
        let mut lines = Vec::new();

        if output.recovered {
            lines.push(format!(
                "Warning: could not read {}; showing a fresh record.",
                output.location
            ));
            lines.push(String::new());
        }

        lines.push("Your Progress".to_string());
        lines.push(format!("  Streak:    {} day(s)", output.streak_days));
        lines.push(format!("  XP:        {}", output.xp));
        lines.push(format!(
            "  Completed: {}/{}",
            output.catalog_completed, output.catalog_total
        ));
        lines.push(format!("  Last active: {}", output.last_active_date));

        lines.push(String::new());
        if output.completed_modules.is_empty() {
            lines.push("No modules completed yet.".to_string());
        } else {
            lines.push("Completed:".to_string());
            for module in &output.completed_modules {
                lines.push(format!("  [x] {}", module));
            }
        }

        if let Some(next) = &output.next_module {
            lines.push(String::new());
            lines.push(format!("Next up: {}", next));
        }

        if !output.issues.is_empty() {
            lines.push(String::new());
            lines.push("Progress data has issues:".to_string());
            for issue in &output.issues {
                lines.push(format!("  - {}", issue));
            }
        }

        lines.join("\n")
    }
}

//! Complete command.
//!
//! Marks a module complete, awarding XP the first time, and saves the
//! record. A malformed progress file aborts the command instead of being
//! overwritten.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{complete_module_on, is_catalog_module, today, DEFAULT_XP_PER_MODULE};
use crate::error::Result;
use crate::storage::ProgressStore;

/// Options for the complete command.
#[derive(Debug, Clone, Default)]
pub struct CompleteOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// XP to award instead of the configured reward.
    pub xp: Option<i64>,
}

/// Output format for the complete command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The module name as recorded (trimmed).
    pub module: String,
    /// XP awarded by this call (0 when already completed).
    pub awarded_xp: i64,
    /// Whether the module had been completed before.
    pub already_completed: bool,
    /// Whether the module belongs to the curriculum.
    pub in_catalog: bool,
    /// Total XP after the call.
    pub total_xp: i64,
    /// Streak after the call.
    pub streak_days: i64,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompleteOutput {
    /// Create a failed output.
    pub fn failure(module: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            module: module.into(),
            awarded_xp: 0,
            already_completed: false,
            in_catalog: false,
            total_xp: 0,
            streak_days: 0,
            error: Some(error.into()),
        }
    }
}

/// The complete command implementation.
pub struct CompleteCommand<S: ProgressStore> {
    store: S,
    xp_per_module: i64,
    today: NaiveDate,
}

impl<S: ProgressStore> CompleteCommand<S> {
    /// Create a new complete command with the default reward.
    pub fn new(store: S) -> Self {
        Self {
            store,
            xp_per_module: DEFAULT_XP_PER_MODULE,
            today: today(),
        }
    }

    /// Use a configured reward per module.
    pub fn with_reward(mut self, xp_per_module: i64) -> Self {
        self.xp_per_module = xp_per_module;
        self
    }

    /// Use a fixed date instead of the local calendar.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run the complete command.
    pub fn run(&self, module: &str, options: &CompleteOptions) -> CompleteOutput {
        let module = module.trim();
        if module.is_empty() {
            return CompleteOutput::failure(module, "Module name is empty");
        }

        let reward = options.xp.unwrap_or(self.xp_per_module);
        if reward < 0 {
            return CompleteOutput::failure(module, "XP reward must not be negative");
        }

        match self.complete(module, reward) {
            Ok(output) => output,
            Err(e) => CompleteOutput::failure(module, format!("Failed to update progress: {}", e)),
        }
    }

    fn complete(&self, module: &str, reward: i64) -> Result<CompleteOutput> {
        let record = self.store.load()?;
        let already_completed = record.has_completed(module);
        let xp_before = record.xp;

        let mut record = complete_module_on(record, module, reward, self.today);
        self.store.save(&mut record)?;

        let in_catalog = is_catalog_module(module);
        if !in_catalog {
            tracing::warn!(module, "completed a module outside the curriculum");
        }

        Ok(CompleteOutput {
            success: true,
            module: module.to_string(),
            awarded_xp: record.xp.saturating_sub(xp_before),
            already_completed,
            in_catalog,
            total_xp: record.xp,
            streak_days: record.streak_days,
            error: None,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &CompleteOutput, options: &CompleteOptions) -> String {
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
    fn format_human_readable(&self, output: &CompleteOutput) -> String {
        if !output.success {
            return format!(
                "Complete failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        if output.already_completed {
            lines.push(format!("You already completed {}.", output.module));
        } else {
            lines.push(format!(
                "Saved! {} complete, +{} XP.",
                output.module, output.awarded_xp
            ));
        }
        if !output.in_catalog {
            lines.push("Note: this module is not part of the curriculum.".to_string());
        }
        lines.push(format!(
            "XP: {}  Streak: {} day(s)",
            output.total_xp, output.streak_days
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProgressRecord;
    use crate::storage::MemoryProgressStore;
    use std::sync::Arc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_store() -> Arc<MemoryProgressStore> {
        let mut record = ProgressRecord::new();
        record.last_active_date = "2024-05-10".to_string();
        record.streak_days = 1;
        Arc::new(MemoryProgressStore::with_record(record))
    }

    #[test]
    fn test_complete_awards_default_xp() {
        let store = create_test_store();
        let cmd = CompleteCommand::new(Arc::clone(&store)).with_today(day(2024, 5, 11));

        let output = cmd.run("Module 4: Backtesting", &CompleteOptions::default());
        assert!(output.success);
        assert_eq!(output.awarded_xp, 100);
        assert!(!output.already_completed);
        assert!(output.in_catalog);
        assert_eq!(output.streak_days, 2);

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.completed_modules, vec!["Module 4: Backtesting"]);
        assert_eq!(saved.xp, 100);
    }

    #[test]
    fn test_complete_twice_awards_once() {
        let store = create_test_store();
        let cmd = CompleteCommand::new(Arc::clone(&store)).with_today(day(2024, 5, 11));

        cmd.run("Module 4: Backtesting", &CompleteOptions::default());
        let output = cmd.run("  Module 4: Backtesting ", &CompleteOptions::default());

        assert!(output.success);
        assert!(output.already_completed);
        assert_eq!(output.awarded_xp, 0);
        assert_eq!(output.total_xp, 100);
        assert_eq!(store.snapshot().unwrap().completed_modules.len(), 1);

        let text = cmd.format_output(&output, &CompleteOptions::default());
        assert!(text.contains("already completed"));
    }

    #[test]
    fn test_complete_reward_precedence() {
        let store = create_test_store();
        let cmd = CompleteCommand::new(Arc::clone(&store))
            .with_reward(40)
            .with_today(day(2024, 5, 11));

        let output = cmd.run("Module 8: NLP", &CompleteOptions::default());
        assert_eq!(output.awarded_xp, 40);

        let options = CompleteOptions {
            xp: Some(5),
            ..Default::default()
        };
        let output = cmd.run("Module 9: LLM Trading", &options);
        assert_eq!(output.awarded_xp, 5);
        assert_eq!(output.total_xp, 45);
    }

    #[test]
    fn test_complete_blank_name_does_not_save() {
        let store = create_test_store();
        let before = store.snapshot().unwrap();
        let cmd = CompleteCommand::new(Arc::clone(&store));

        let output = cmd.run("   ", &CompleteOptions::default());
        assert!(!output.success);
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_complete_negative_reward_rejected() {
        let store = create_test_store();
        let cmd = CompleteCommand::new(Arc::clone(&store));
        let options = CompleteOptions {
            xp: Some(-10),
            ..Default::default()
        };

        let output = cmd.run("Module 8: NLP", &options);
        assert!(!output.success);
        assert!(store.snapshot().unwrap().completed_modules.is_empty());
    }

    #[test]
    fn test_complete_outside_catalog() {
        let cmd = CompleteCommand::new(create_test_store()).with_today(day(2024, 5, 11));
        let output = cmd.run("Options Pricing", &CompleteOptions::default());

        assert!(output.success);
        assert!(!output.in_catalog);
        let text = cmd.format_output(&output, &CompleteOptions::default());
        assert!(text.contains("not part of the curriculum"));
    }

    #[test]
    fn test_complete_at_xp_ceiling_saturates() {
        let store = Arc::new(MemoryProgressStore::with_raw(
            r#"{"xp": 9223372036854775807, "last_active_date": "2024-01-01"}"#,
        ));
        let cmd = CompleteCommand::new(Arc::clone(&store)).with_today(day(2024, 1, 1));

        let output = cmd.run("Module 1: Python Foundations", &CompleteOptions::default());
        assert!(output.success);
        assert!(!output.already_completed);
        assert_eq!(output.awarded_xp, 0);
        assert_eq!(output.total_xp, i64::MAX);

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.xp, i64::MAX);
        assert_eq!(saved.completed_modules, vec!["Module 1: Python Foundations"]);
    }

    #[test]
    fn test_complete_malformed_store_is_not_overwritten() {
        let store = Arc::new(MemoryProgressStore::with_raw(r#"{"xp": "many"}"#));
        let cmd = CompleteCommand::new(Arc::clone(&store));

        let output = cmd.run("Module 8: NLP", &CompleteOptions::default());
        assert!(!output.success);
        let error = output.error.unwrap();
        assert!(error.starts_with("Failed to update progress"));
        assert!(error.contains("field `xp`"));
        assert!(store.snapshot().is_none());
    }
}

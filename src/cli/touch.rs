//! Touch command.
//!
//! Records today's activity and saves the updated streak.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{today, touch_activity_on, StreakTransition};
use crate::error::Result;
use crate::storage::ProgressStore;

/// Options for the touch command.
#[derive(Debug, Clone, Default)]
pub struct TouchOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the touch command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// How the streak changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
    /// Streak after the touch.
    pub streak_days: i64,
    /// Last active date after the touch.
    pub last_active_date: String,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TouchOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            transition: None,
            streak_days: 0,
            last_active_date: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The touch command implementation.
pub struct TouchCommand<S: ProgressStore> {
    store: S,
    today: NaiveDate,
}

impl<S: ProgressStore> TouchCommand<S> {
    /// Create a new touch command for the current day.
    pub fn new(store: S) -> Self {
        Self {
            store,
            today: today(),
        }
    }

    /// Use a fixed date instead of the local calendar.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run the touch command.
    pub fn run(&self, _options: &TouchOptions) -> TouchOutput {
        match self.touch() {
            Ok(output) => output,
            Err(e) => TouchOutput::failure(format!("Failed to record activity: {}", e)),
        }
    }

    fn touch(&self) -> Result<TouchOutput> {
        let record = self.store.load()?;
        let transition = StreakTransition::between(record.last_active(), self.today);

        let mut record = touch_activity_on(record, self.today);
        self.store.save(&mut record)?;

        Ok(TouchOutput {
            success: true,
            transition: Some(transition.as_str().to_string()),
            streak_days: record.streak_days,
            last_active_date: record.last_active_date,
            error: None,
        })
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &TouchOutput, options: &TouchOptions) -> String {
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
    fn format_human_readable(&self, output: &TouchOutput) -> String {
        if !output.success {
            return format!(
                "Touch failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let detail = match output.transition.as_deref() {
            Some("unchanged") => "already active today",
            Some("extend") => "streak extended",
            _ => "new streak started",
        };
        format!(
            "Activity saved ({}). Streak: {} day(s)",
            detail, output.streak_days
        )
    }
}

//! Validate command.
//!
//! Audits the stored record and lists every invariant violation.

use serde::{Deserialize, Serialize};

use crate::core::validate;
use crate::storage::ProgressStore;

/// Options for the validate command.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the validate command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    /// Whether the record could be loaded.
    pub success: bool,
    /// Whether the record passed every check.
    pub valid: bool,
    /// Issues found.
    pub issues: Vec<String>,
    /// Error message if the record could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The validate command implementation.
pub struct ValidateCommand<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> ValidateCommand<S> {
    /// Create a new validate command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the validate command.
    pub fn run(&self, _options: &ValidateOptions) -> ValidateOutput {
        match self.store.load() {
            Ok(record) => {
                let (valid, issues) = validate(&record).into_parts();
                ValidateOutput {
                    success: true,
                    valid,
                    issues,
                    error: None,
                }
            }
            Err(e) => ValidateOutput {
                success: false,
                valid: false,
                issues: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ValidateOutput, options: &ValidateOptions) -> String {
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
    fn format_human_readable(&self, output: &ValidateOutput) -> String {
        if !output.success {
            return format!(
                "Validate failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        if output.valid {
            return "Progress data is valid.".to_string();
        }

        let mut lines = vec![format!("Progress data has {} issue(s):", output.issues.len())];
        for issue in &output.issues {
            lines.push(format!("  - {}", issue));
        }
        lines.join("\n")
    }
}

//! Modules command.
//!
//! Lists the curriculum with completion marks, followed by any completed
//! modules that are not part of it.

use serde::{Deserialize, Serialize};

use crate::core::{is_catalog_module, ProgressRecord, MODULES};
use crate::error::FailOpen;
use crate::storage::ProgressStore;

/// Options for the modules command.
#[derive(Debug, Clone, Default)]
pub struct ModulesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One curriculum entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModuleEntry {
    /// Module name.
    pub name: String,
    /// Whether it has been completed.
    pub completed: bool,
}

/// Output format for the modules command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Curriculum modules in teaching order.
    pub modules: Vec<ModuleEntry>,
    /// Completed modules outside the curriculum.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub extra: Vec<String>,
}

impl ModulesOutput {
    fn from_record(record: &ProgressRecord) -> Self {
        let modules = MODULES
            .iter()
            .map(|name| ModuleEntry {
                name: name.to_string(),
                completed: record.has_completed(name),
            })
            .collect();
        let extra = record
            .completed_modules
            .iter()
            .filter(|m| !is_catalog_module(m))
            .cloned()
            .collect();
        Self {
            success: true,
            modules,
            extra,
        }
    }
}

/// The modules command implementation.
pub struct ModulesCommand<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> ModulesCommand<S> {
    /// Create a new modules command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the modules command.
    pub fn run(&self, _options: &ModulesOptions) -> ModulesOutput {
        let record = self
            .store
            .load()
            .fail_open_else("loading progress", ProgressRecord::new);
        ModulesOutput::from_record(&record)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ModulesOutput, options: &ModulesOptions) -> String {
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
    fn format_human_readable(&self, output: &ModulesOutput) -> String {
        let mut lines = Vec::new();
        for module in &output.modules {
            let mark = if module.completed { "x" } else { " " };
            lines.push(format!("[{}] {}", mark, module.name));
        }
        if !output.extra.is_empty() {
            lines.push(String::new());
            lines.push("Also completed:".to_string());
            for module in &output.extra {
                lines.push(format!("[x] {}", module));
            }
        }
        lines.join("\n")
    }
}

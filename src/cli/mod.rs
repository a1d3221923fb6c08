//! CLI commands for QuantAcademy.
//!
//! Each command loads the record through a [`crate::storage::ProgressStore`],
//! applies the progress rules, and saves the result:
//! - **Read-only commands**: status, modules, validate
//! - **Mutating commands**: touch, complete

// Read-only commands
pub mod modules;
pub mod status;
pub mod validate_cmd;

// Mutating commands
pub mod complete;
pub mod touch;

pub use complete::CompleteCommand;
pub use modules::ModulesCommand;
pub use status::StatusCommand;
pub use touch::TouchCommand;
pub use validate_cmd::ValidateCommand;

//! QuantAcademy - learning progress from the command line.
//!
//! CLI entry point with global panic handler.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quantacademy::cli::complete::{CompleteCommand, CompleteOptions};
use quantacademy::cli::modules::{ModulesCommand, ModulesOptions};
use quantacademy::cli::status::{StatusCommand, StatusOptions};
use quantacademy::cli::touch::{TouchCommand, TouchOptions};
use quantacademy::cli::validate_cmd::{ValidateCommand, ValidateOptions};
use quantacademy::config::Config;
use quantacademy::error::exit_codes;
use quantacademy::storage::{resolve_path, FileProgressStore};

// =============================================================================
// CLI Definition
// =============================================================================

/// QuantAcademy - track XP, completed modules, and your daily streak
#[derive(Parser)]
#[command(name = "quantacademy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Progress file to use instead of the configured location
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show streak, XP, and completed modules
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Mark today as active
    Touch {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Mark a module complete and earn XP
    Complete {
        /// Module name
        module: String,
        /// XP to award (defaults to the configured reward)
        #[arg(long)]
        xp: Option<i64>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Check the stored progress for problems
    Validate {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List curriculum modules with completion marks
    Modules {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print the progress file location
    Path,
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("quantacademy error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

/// Install a stderr log subscriber filtered by `QUANTACADEMY_LOG` (default `warn`).
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("QUANTACADEMY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Set up the global panic handler.
///
/// A panic can only happen before or after a save, never in the middle of
/// the rename, so the progress file is always intact.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("quantacademy panic: {}", info);
        std::process::exit(i32::from(exit_codes::ERROR));
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();

    let path = match cli.path.or_else(|| config.progress_path().map(Path::to_path_buf)) {
        Some(path) => path,
        None => resolve_path()?,
    };
    let store = FileProgressStore::with_path(path);

    match cli.command {
        Commands::Status { json, quiet } => {
            let cmd = StatusCommand::new(store);
            let options = StatusOptions { json, quiet };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Touch { json, quiet } => {
            let cmd = TouchCommand::new(store);
            let options = TouchOptions { json, quiet };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Complete {
            module,
            xp,
            json,
            quiet,
        } => {
            let cmd = CompleteCommand::new(store).with_reward(config.rewards.xp_per_module);
            let options = CompleteOptions { json, quiet, xp };
            let output = cmd.run(&module, &options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Validate { json, quiet } => {
            let cmd = ValidateCommand::new(store);
            let options = ValidateOptions { json, quiet };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            let code = if !output.success {
                exit_codes::ERROR
            } else if !output.valid {
                exit_codes::ISSUES
            } else {
                exit_codes::SUCCESS
            };
            Ok(ExitCode::from(code))
        }
        Commands::Modules { json, quiet } => {
            let cmd = ModulesCommand::new(store);
            let options = ModulesOptions { json, quiet };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Path => {
            println!("{}", store.path().display());
            Ok(ExitCode::from(exit_codes::SUCCESS))
        }
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS)
    } else {
        ExitCode::from(exit_codes::ERROR)
    }
}

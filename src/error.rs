//! Unified error types for QuantAcademy progress tracking.
//!
//! The library never retries and never swallows a failure on its own. Callers
//! that prefer to keep going (for example a status display) opt in to
//! fail-open handling through the [`FailOpen`] trait.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for progress operations.
#[derive(Error, Debug)]
pub enum ProgressError {
    /// Filesystem errors while reading or writing the progress file.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The progress file exists but its contents cannot be used.
    #[error("invalid progress data in {path}: {message}")]
    Format { path: PathBuf, message: String },

    /// JSON serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

impl ProgressError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a data-format error for a progress file.
    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this is a data-format failure (the file exists but is unusable).
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Whether this is a filesystem-level failure.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

impl From<io::Error> for ProgressError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

/// Trait for fail-open error handling.
///
/// Recovery is a caller decision: this trait lets a caller log the error and
/// continue with a safe value instead of aborting.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning a fallback built on demand.
    fn fail_open_else(self, context: &str, fallback: impl FnOnce() -> T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        self.fail_open_else(context, T::default)
    }

    fn fail_open_else(self, context: &str, fallback: impl FnOnce() -> T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback()
            }
        }
    }
}

/// Exit codes for the `quantacademy` binary.
pub mod exit_codes {
    /// The command completed successfully.
    pub const SUCCESS: u8 = 0;

    /// The command ran but found validation issues.
    pub const ISSUES: u8 = 1;

    /// The command failed (storage or data-format error).
    pub const ERROR: u8 = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = ProgressError::storage(
            "/tmp/progress.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/progress.json"));
        assert!(err.is_storage());
        assert!(!err.is_format());
    }

    #[test]
    fn test_format_error_display() {
        let err = ProgressError::format("/tmp/progress.json", "field `xp`: expected an integer");
        assert_eq!(
            err.to_string(),
            "invalid progress data in /tmp/progress.json: field `xp`: expected an integer"
        );
        assert!(err.is_format());
    }

    #[test]
    fn test_config_error_display() {
        let err = ProgressError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: ProgressError = io_err.into();
        assert!(matches!(err, ProgressError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ProgressError = json_err.into();
        assert!(matches!(err, ProgressError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(ProgressError::serde("test"));
        assert!(result.fail_open_default("test context").is_empty());
    }

    #[test]
    fn test_fail_open_else_builds_fallback_on_error() {
        let result: Result<i64> = Err(ProgressError::config("test"));
        assert_eq!(result.fail_open_else("test context", || 42), 42);
    }

    #[test]
    fn test_fail_open_else_success_skips_fallback() {
        let result: Result<i64> = Ok(7);
        let value = result.fail_open_else("test context", || panic!("fallback built"));
        assert_eq!(value, 7);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::ISSUES, 1);
        assert_eq!(exit_codes::ERROR, 2);
    }
}

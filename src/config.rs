//! Configuration loading for QuantAcademy.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.quantacademy/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The progress store itself never reads
//! configuration; the command-line front end resolves it and passes explicit
//! values down.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::DEFAULT_XP_PER_MODULE;
use crate::error::{FailOpen, ProgressError, Result};

/// Name of the per-user application directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".quantacademy";

/// File name of the progress record.
pub const PROGRESS_FILE_NAME: &str = "progress.json";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// XP reward configuration.
    pub rewards: RewardsConfig,
    /// Progress file location.
    pub storage: StorageConfig,
}

/// XP reward configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewardsConfig {
    /// XP awarded per completed module.
    pub xp_per_module: i64,
}

impl RewardsConfig {
    /// Rewards must not be negative.
    pub fn is_valid_xp(value: i64) -> bool {
        value >= 0
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            xp_per_module: DEFAULT_XP_PER_MODULE,
        }
    }
}

/// Progress file location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Explicit progress file path. `None` uses `<home>/progress.json`.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();
        config
    }

    /// Load user config from `<home>/config.toml`.
    fn load_user_config() -> Option<Config> {
        let path = academy_home()?.join("config.toml");
        if !path.exists() {
            return None;
        }
        Self::load_from_file(&path)
            .map(Some)
            .fail_open_default("loading user config")
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| ProgressError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| ProgressError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // QUANTACADEMY_XP_PER_MODULE
        if let Ok(val) = env::var("QUANTACADEMY_XP_PER_MODULE") {
            match val.trim().parse::<i64>() {
                Ok(n) if RewardsConfig::is_valid_xp(n) => self.rewards.xp_per_module = n,
                _ => tracing::warn!(
                    value = %val,
                    "invalid QUANTACADEMY_XP_PER_MODULE, must be a non-negative integer"
                ),
            }
        }

        // QUANTACADEMY_PROGRESS_PATH
        if let Ok(val) = env::var("QUANTACADEMY_PROGRESS_PATH") {
            if val.is_empty() {
                tracing::warn!("QUANTACADEMY_PROGRESS_PATH is empty, ignoring");
            } else {
                self.storage.path = Some(PathBuf::from(val));
            }
        }
    }

    /// Merge another config into this one; non-default values in `other` win.
    fn merge(mut self, other: Config) -> Self {
        if other.rewards.xp_per_module != RewardsConfig::default().xp_per_module {
            if RewardsConfig::is_valid_xp(other.rewards.xp_per_module) {
                self.rewards.xp_per_module = other.rewards.xp_per_module;
            } else {
                tracing::warn!(
                    xp_per_module = other.rewards.xp_per_module,
                    "ignoring negative xp_per_module from config"
                );
            }
        }
        if other.storage.path.is_some() {
            self.storage.path = other.storage.path;
        }
        self
    }

    /// The progress file this config points at, if overridden.
    pub fn progress_path(&self) -> Option<&Path> {
        self.storage.path.as_deref()
    }
}

/// Get the QuantAcademy home directory.
///
/// Checks `QUANTACADEMY_HOME` first, then falls back to `~/.quantacademy`.
/// An empty override is ignored.
pub fn academy_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("QUANTACADEMY_HOME") {
        if home.is_empty() {
            tracing::warn!("QUANTACADEMY_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("QUANTACADEMY_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(APP_DIR_NAME));
    }

    let fallback_path = fallback_academy_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Get fallback home path when HOME is unavailable.
#[cfg(unix)]
fn fallback_academy_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    env::temp_dir().join(format!("quantacademy-{}", uid))
}

/// Get fallback home path when HOME is unavailable.
#[cfg(not(unix))]
fn fallback_academy_home() -> PathBuf {
    env::temp_dir().join("quantacademy")
}

/// Get the default progress file path.
///
/// Returns `<academy_home>/progress.json`.
pub fn default_progress_path() -> Option<PathBuf> {
    academy_home().map(|h| h.join(PROGRESS_FILE_NAME))
}

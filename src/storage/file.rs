//! File-based progress storage.
//!
//! The record lives in `~/.quantacademy/progress.json`. Writes go through a
//! temp file in the same directory followed by an atomic rename, so readers
//! see either the old file or the new one and never a partial write.
//!
//! Atomicity depends on the filesystem providing rename-in-place. On
//! filesystems that do not (some network mounts) the replace is best-effort.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::config::default_progress_path;
use crate::core::ProgressRecord;
use crate::error::{ProgressError, Result};
use crate::storage::codec::{decode_record, encode_record};
use crate::storage::ProgressStore;

/// Return the default progress file path, creating its directory.
pub fn resolve_path() -> Result<PathBuf> {
    let path = default_progress_path().ok_or_else(|| {
        ProgressError::config("Could not determine progress directory (no home directory)")
    })?;
    ensure_parent_dir(&path)?;
    Ok(path)
}

/// Load the record at `path`, or at the default location when `None`.
///
/// A missing file yields a fresh record. A file that exists but cannot be
/// decoded is a [`ProgressError::Format`].
pub fn load(path: Option<&Path>) -> Result<ProgressRecord> {
    match path {
        Some(path) => load_from(path),
        None => load_from(&resolve_path()?),
    }
}

/// Save `record` to `path`, or to the default location when `None`.
///
/// Stamps `updated_at` before writing and returns the destination path.
pub fn save(record: &mut ProgressRecord, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => resolve_path()?,
    };
    stage(record, &path)?.commit()
}

fn load_from(path: &Path) -> Result<ProgressRecord> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no progress file, starting fresh");
            return Ok(ProgressRecord::new());
        }
        Err(e) => return Err(ProgressError::storage(path, e)),
    };
    let content = String::from_utf8(bytes)
        .map_err(|e| ProgressError::format(path, format!("not valid UTF-8: {}", e)))?;

    let record = decode_record(&content, ProgressRecord::new())
        .map_err(|m| ProgressError::format(path, m))?;
    tracing::debug!(path = %path.display(), xp = record.xp, "loaded progress");
    Ok(record)
}

/// Stamp `record` and write it to a synced temp file next to `path`.
///
/// Nothing is visible at `path` until [`StagedWrite::commit`] is called.
pub fn stage(record: &mut ProgressRecord, path: &Path) -> Result<StagedWrite> {
    record.stamp(Utc::now());
    let json = encode_record(record)?;

    let parent = ensure_parent_dir(path)?;
    let (prefix, suffix) = temp_affixes(path);

    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(&suffix)
        .tempfile_in(&parent)
        .map_err(|e| ProgressError::storage(&parent, e))?;

    // On error the temp file is dropped, which removes it (best-effort).
    write_synced(&mut temp, json.as_bytes())
        .map_err(|e| ProgressError::storage(temp.path(), e))?;

    Ok(StagedWrite {
        temp,
        destination: path.to_path_buf(),
    })
}

fn write_synced(temp: &mut NamedTempFile, bytes: &[u8]) -> io::Result<()> {
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()
}

/// A fully written temp file waiting to replace its destination.
///
/// Dropping a staged write without committing removes the temp file and
/// leaves the destination untouched.
#[derive(Debug)]
pub struct StagedWrite {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl StagedWrite {
    /// Path of the temp file holding the new content.
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Atomically rename the temp file onto the destination.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { temp, destination } = self;

        // A failed persist hands the temp file back inside the error;
        // dropping the error removes it.
        temp.persist(&destination)
            .map_err(|e| ProgressError::storage(&destination, e.error))?;

        if let Some(parent) = destination.parent() {
            best_effort_sync_dir(parent);
        }

        tracing::debug!(path = %destination.display(), "saved progress");
        Ok(destination)
    }
}

/// Create the parent directory of `path` and return it.
fn ensure_parent_dir(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| ProgressError::storage(&parent, e))?;
    Ok(parent)
}

/// Temp file prefix and suffix for a destination: `progress.json` gives
/// `.progress.` and `.json.tmp`.
fn temp_affixes(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "progress".to_string());
    let suffix = match path.extension() {
        Some(ext) => format!(".{}.tmp", ext.to_string_lossy()),
        None => ".tmp".to_string(),
    };
    (format!(".{}.", stem), suffix)
}

#[cfg(unix)]
fn best_effort_sync_dir(dir: &Path) {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    if let Err(e) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(path = %dir.display(), "directory sync failed (best-effort): {}", e);
    }
}

#[cfg(not(unix))]
fn best_effort_sync_dir(_dir: &Path) {}

/// File-based progress store bound to one path.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    /// Location of the progress file.
    path: PathBuf,
}

impl FileProgressStore {
    /// Create a store at the default location (`~/.quantacademy/progress.json`
    /// or `$QUANTACADEMY_HOME/progress.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: resolve_path()?,
        })
    }

    /// Create a store for a specific file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The progress file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage a write of `record` without making it visible yet.
    pub fn stage(&self, record: &mut ProgressRecord) -> Result<StagedWrite> {
        stage(record, &self.path)
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Result<ProgressRecord> {
        load_from(&self.path)
    }

    fn save(&self, record: &mut ProgressRecord) -> Result<()> {
        self.stage(record)?.commit().map(|_| ())
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.path.is_file())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

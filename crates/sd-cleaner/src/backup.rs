//! Timestamped backups taken before a rule file is rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};

use crate::error::{CleanError, Result};

pub const DEFAULT_BACKUP_LABEL: &str = "backup";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<file name>.<label>_<YYYYMMDD_HHMMSS>`
pub fn backup_name<Tz: TimeZone>(file_name: &str, label: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.{}_{}", file_name, label, at.format(TIMESTAMP_FORMAT))
}

/// Copies `source` into `backup_dir` under a timestamped name and returns the
/// backup path. The directory is created if needed; an existing backup with
/// the same name is never overwritten.
pub fn backup_file(source: &Path, backup_dir: &Path, label: &str, at: &DateTime<Local>) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CleanError::InvalidFileName(source.display().to_string()))?;

    fs::create_dir_all(backup_dir).map_err(|e| CleanError::Backup {
        path: source.to_path_buf(),
        backup: backup_dir.to_path_buf(),
        source: e,
    })?;

    let base = backup_name(&file_name, label, at);
    let mut target = backup_dir.join(&base);
    let mut attempt = 1u32;
    while target.exists() {
        target = backup_dir.join(format!("{}_{}", base, attempt));
        attempt += 1;
    }

    fs::copy(source, &target).map_err(|e| CleanError::Backup {
        path: source.to_path_buf(),
        backup: target.clone(),
        source: e,
    })?;

    log::info!("backed up {} to {}", source.display(), target.display());
    Ok(target)
}

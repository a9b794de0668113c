use std::fs;
use std::path::{Path, PathBuf};

use sd_core::{DuplicateDetector, DuplicateReport};

use crate::error::{CleanError, Result};

pub const RULE_FILE_EXTENSION: &str = "list";

/// All `.list` files directly inside `dir`, sorted by file name.
pub fn collect_rule_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CleanError::Read {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CleanError::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == RULE_FILE_EXTENSION) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn read_rule_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CleanError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Runs duplicate detection over the given files. Files are reported under
/// their file name.
pub fn scan_files(paths: &[PathBuf]) -> Result<DuplicateReport> {
    let mut detector = DuplicateDetector::new();
    for path in paths {
        let text = read_rule_file(path)?;
        detector.add_file(display_name(path), &text);
    }
    log::info!(
        "scanned {} files, {} distinct values",
        detector.file_count(),
        detector.value_count()
    );
    Ok(detector.report())
}

/// Scans every `.list` file in `dir`.
pub fn scan_dir(dir: &Path) -> Result<DuplicateReport> {
    let files = collect_rule_files(dir)?;
    if files.is_empty() {
        log::warn!("no .{} files found in {}", RULE_FILE_EXTENSION, dir.display());
    }
    scan_files(&files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

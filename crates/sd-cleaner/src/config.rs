//! JSON configuration and plan files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sd_core::{CleanupPlan, PriorityTable};

use crate::backup::DEFAULT_BACKUP_LABEL;
use crate::error::{CleanError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "surgedup.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub backup_label: String,
    pub priority: PriorityTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("rules"),
            backup_dir: PathBuf::from("backups"),
            backup_label: DEFAULT_BACKUP_LABEL.to_string(),
            priority: PriorityTable::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            log::debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

pub fn load_plan(path: &Path) -> Result<CleanupPlan> {
    read_json(path)
}

pub fn save_plan(path: &Path, plan: &CleanupPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).map_err(|e| CleanError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CleanError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, json + "\n").map_err(|e| CleanError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| CleanError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| CleanError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

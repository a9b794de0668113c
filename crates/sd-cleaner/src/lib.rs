//! surgedup Rule List Cleaner
//!
//! Filesystem side of surgedup: reads `.list` files, takes timestamped
//! backups and rewrites files according to a cleanup plan.

pub mod error;
pub mod files;
pub mod backup;
pub mod cleaner;
pub mod config;

pub use backup::{backup_file, backup_name, DEFAULT_BACKUP_LABEL};
pub use cleaner::{strip_values, CleanOutcome, CleanStatus, Cleaner, PlanFailure, PlanOutcome};
pub use config::{load_plan, save_plan, Config, DEFAULT_CONFIG_FILE};
pub use error::CleanError;
pub use files::{collect_rule_files, scan_dir, scan_files};

//! Backup-first removal of rule values from `.list` files.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};

use sd_core::{rule_value, CleanupPlan};

use crate::backup::{backup_file, DEFAULT_BACKUP_LABEL};
use crate::error::{CleanError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanStatus {
    /// Lines were removed and the file was rewritten.
    Cleaned,
    /// Nothing matched; the file was backed up but left as is.
    Unchanged,
    /// Dry run: counts only, no backup and no write.
    DryRun,
    /// The file does not exist. Nothing was done.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutcome {
    pub path: PathBuf,
    pub status: CleanStatus,
    /// Removed values, one per removed line, in file order.
    pub removed: Vec<String>,
    pub backup: Option<PathBuf>,
}

impl CleanOutcome {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// A plan file that could not be cleaned. Files after it were not attempted.
#[derive(Debug)]
pub struct PlanFailure {
    pub path: PathBuf,
    pub error: CleanError,
}

#[derive(Debug, Default)]
pub struct PlanOutcome {
    /// Files handled before the run stopped, in plan order.
    pub files: Vec<CleanOutcome>,
    pub failure: Option<PlanFailure>,
}

impl PlanOutcome {
    pub fn total_removed(&self) -> usize {
        self.files.iter().map(CleanOutcome::removed_count).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of filtering a rule file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    pub removed: Vec<String>,
}

/// Drops every line whose rule value is in `values`. All other lines,
/// including their terminators, are kept byte for byte and in order.
pub fn strip_values(text: &str, values: &BTreeSet<String>) -> Stripped {
    let mut kept = String::with_capacity(text.len());
    let mut removed = Vec::new();

    for line in text.split_inclusive('\n') {
        match rule_value(line) {
            Some(value) if values.contains(&value) => removed.push(value),
            _ => kept.push_str(line),
        }
    }

    Stripped { text: kept, removed }
}

/// Rewrites rule files, taking a timestamped backup of each one first.
#[derive(Debug, Clone)]
pub struct Cleaner {
    backup_dir: PathBuf,
    backup_label: String,
    dry_run: bool,
    timestamp: Option<DateTime<Local>>,
}

impl Cleaner {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            backup_label: DEFAULT_BACKUP_LABEL.to_string(),
            dry_run: false,
            timestamp: None,
        }
    }

    pub fn with_backup_label(mut self, label: impl Into<String>) -> Self {
        self.backup_label = label.into();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Pins the backup timestamp instead of reading the clock per file.
    pub fn with_timestamp(mut self, at: DateTime<Local>) -> Self {
        self.timestamp = Some(at);
        self
    }

    pub fn clean_file(&self, path: &Path, values: &BTreeSet<String>) -> Result<CleanOutcome> {
        if !path.exists() {
            log::warn!("{} does not exist, skipping", path.display());
            return Ok(CleanOutcome {
                path: path.to_path_buf(),
                status: CleanStatus::Skipped,
                removed: Vec::new(),
                backup: None,
            });
        }

        let text = fs::read_to_string(path).map_err(|e| CleanError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let stripped = strip_values(&text, values);

        if self.dry_run {
            return Ok(CleanOutcome {
                path: path.to_path_buf(),
                status: CleanStatus::DryRun,
                removed: stripped.removed,
                backup: None,
            });
        }

        let at = self.timestamp.unwrap_or_else(Local::now);
        let backup = backup_file(path, &self.backup_dir, &self.backup_label, &at)?;

        let status = if stripped.removed.is_empty() {
            CleanStatus::Unchanged
        } else {
            fs::write(path, &stripped.text).map_err(|e| CleanError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
            for value in &stripped.removed {
                log::debug!("removed {} from {}", value, path.display());
            }
            CleanStatus::Cleaned
        };

        log::info!("{}: removed {} lines", path.display(), stripped.removed.len());

        Ok(CleanOutcome {
            path: path.to_path_buf(),
            status,
            removed: stripped.removed,
            backup: Some(backup),
        })
    }

    /// Applies a plan to the files in `rules_dir`, one file at a time. The
    /// plan's backup label, if any, overrides the cleaner's.
    ///
    /// Invalid file names fail the whole plan before any file is read. A
    /// failure on one file stops the run; the outcome still lists every file
    /// cleaned before it, with its backup.
    pub fn apply_plan(&self, rules_dir: &Path, plan: &CleanupPlan) -> Result<PlanOutcome> {
        for file in plan.files() {
            validate_file_name(file)?;
        }

        let cleaner = match &plan.backup_label {
            Some(label) => self.clone().with_backup_label(label.clone()),
            None => self.clone(),
        };

        let mut outcome = PlanOutcome::default();
        for (file, values) in &plan.removals {
            let path = rules_dir.join(file);
            match cleaner.clean_file(&path, values) {
                Ok(done) => outcome.files.push(done),
                Err(error) => {
                    log::error!("stopping plan at {}: {}", path.display(), error);
                    outcome.failure = Some(PlanFailure { path, error });
                    break;
                }
            }
        }
        Ok(outcome)
    }
}

/// Plan entries must name a file directly inside the rules directory.
fn validate_file_name(file: &str) -> Result<()> {
    let mut components = Path::new(file).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(CleanError::InvalidFileName(file.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sd_core::parse_rule_list;

    fn values(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn cleaner(root: &Path) -> Cleaner {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).earliest().unwrap();
        Cleaner::new(root.join("backups")).with_timestamp(at)
    }

    #[test]
    fn strip_keeps_unmatched_lines_byte_identical() {
        let text = "# Netflix\r\n\nIP-CIDR,52.12.0.0/15,PROXY\r\nUSER-AGENT,Argo*,PROXY\n  # indented\nDOMAIN,x.com\nIP-CIDR,1.1.1.0/24,PROXY";
        let stripped = strip_values(text, &values(&["52.12.0.0/15", "1.1.1.0/24"]));
        assert_eq!(
            stripped.text,
            "# Netflix\r\n\nUSER-AGENT,Argo*,PROXY\n  # indented\nDOMAIN,x.com\n"
        );
        assert_eq!(stripped.removed, vec!["52.12.0.0/15", "1.1.1.0/24"]);
    }

    #[test]
    fn strip_removes_every_occurrence_across_types() {
        let text = "DOMAIN,a.com,P\nDOMAIN-SUFFIX,a.com,P\nDOMAIN,b.com,P\nDOMAIN,a.com,Q\n";
        let stripped = strip_values(text, &values(&["a.com"]));
        assert_eq!(stripped.removed.len(), 3);
        assert_eq!(stripped.text, "DOMAIN,b.com,P\n");
    }

    #[test]
    fn strip_ignores_commented_rules() {
        let text = "# IP-CIDR,52.12.0.0/15,PROXY\n";
        let stripped = strip_values(text, &values(&["52.12.0.0/15"]));
        assert_eq!(stripped.text, text);
        assert!(stripped.removed.is_empty());
    }

    #[test]
    fn removes_value_from_target_only() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("A.list");
        let b = dir.path().join("B.list");
        let original_a = "# A\nIP-CIDR,52.12.0.0/15,PROXY\nIP-CIDR,23.246.0.0/18,PROXY\n";
        let original_b = "IP-CIDR,52.12.0.0/15,PROXY\n";
        fs::write(&a, original_a).unwrap();
        fs::write(&b, original_b).unwrap();

        let outcome = cleaner(dir.path())
            .clean_file(&a, &values(&["52.12.0.0/15"]))
            .unwrap();

        assert_eq!(outcome.status, CleanStatus::Cleaned);
        assert_eq!(outcome.removed_count(), 1);
        assert_eq!(
            fs::read_to_string(&a).unwrap(),
            "# A\nIP-CIDR,23.246.0.0/18,PROXY\n"
        );
        assert_eq!(fs::read_to_string(&b).unwrap(), original_b);

        let backup = outcome.backup.expect("backup should be taken");
        assert_eq!(
            backup,
            dir.path().join("backups/A.list.backup_20240501_120000")
        );
        assert_eq!(fs::read_to_string(backup).unwrap(), original_a);
    }

    #[test]
    fn entry_count_drops_by_occurrences() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Global.list");
        fs::write(
            &path,
            "DOMAIN,a.com,P\nDOMAIN,b.com,P\nDOMAIN-SUFFIX,a.com,P\nDOMAIN,c.com,P\n",
        )
        .unwrap();

        let before = parse_rule_list(&fs::read_to_string(&path).unwrap()).len();
        let outcome = cleaner(dir.path()).clean_file(&path, &values(&["a.com"])).unwrap();
        let after = parse_rule_list(&fs::read_to_string(&path).unwrap()).len();

        assert_eq!(outcome.removed_count(), 2);
        assert_eq!(before - after, 2);
    }

    #[test]
    fn missing_file_is_skipped_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = cleaner(dir.path())
            .clean_file(&dir.path().join("Global.list"), &values(&["a.com"]))
            .unwrap();

        assert_eq!(outcome.status, CleanStatus::Skipped);
        assert_eq!(outcome.removed_count(), 0);
        assert!(outcome.backup.is_none());
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.list");
        fs::write(&path, "DOMAIN,a.com,P\n").unwrap();

        let outcome = cleaner(dir.path())
            .dry_run(true)
            .clean_file(&path, &values(&["a.com"]))
            .unwrap();

        assert_eq!(outcome.status, CleanStatus::DryRun);
        assert_eq!(outcome.removed, vec!["a.com"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "DOMAIN,a.com,P\n");
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn unmatched_file_is_backed_up_but_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.list");
        fs::write(&path, "DOMAIN,a.com,P\n").unwrap();

        let outcome = cleaner(dir.path()).clean_file(&path, &values(&["z.com"])).unwrap();
        assert_eq!(outcome.status, CleanStatus::Unchanged);
        assert!(outcome.backup.unwrap().exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "DOMAIN,a.com,P\n");
    }

    #[test]
    fn backup_failure_aborts_before_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.list");
        fs::write(&path, "DOMAIN,a.com,P\n").unwrap();
        // a regular file where the backup directory should be
        let blocker = dir.path().join("backups");
        fs::write(&blocker, "").unwrap();

        let err = cleaner(dir.path()).clean_file(&path, &values(&["a.com"])).unwrap_err();
        assert!(matches!(err, CleanError::Backup { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "DOMAIN,a.com,P\n");
    }

    #[test]
    fn applies_plan_with_its_backup_label() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules");
        fs::create_dir(&rules).unwrap();
        fs::write(
            rules.join("Global.list"),
            "IP-CIDR,45.57.0.0/17,PROXY\nIP-CIDR,8.8.8.0/24,PROXY\n",
        )
        .unwrap();
        fs::write(rules.join("GlobalMedia.list"), "IP-CIDR,198.45.48.0/20,Media\n").unwrap();
        fs::write(rules.join("Netflix.list"), "IP-CIDR,45.57.0.0/17,Netflix\nIP-CIDR,198.45.48.0/20,Netflix\n").unwrap();

        let mut plan = CleanupPlan::new().with_backup_label("final_backup");
        plan.add("Global.list", "45.57.0.0/17");
        plan.add("GlobalMedia.list", "198.45.48.0/20");
        plan.add("Gone.list", "1.2.3.0/24");

        let outcome = cleaner(dir.path()).apply_plan(&rules, &plan).unwrap();

        assert_eq!(outcome.total_removed(), 2);
        let statuses: Vec<_> = outcome.files.iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            vec![CleanStatus::Cleaned, CleanStatus::Cleaned, CleanStatus::Skipped]
        );
        assert!(dir
            .path()
            .join("backups/Global.list.final_backup_20240501_120000")
            .exists());
        assert_eq!(
            fs::read_to_string(rules.join("Netflix.list")).unwrap(),
            "IP-CIDR,45.57.0.0/17,Netflix\nIP-CIDR,198.45.48.0/20,Netflix\n"
        );
    }

    #[test]
    fn plan_entries_cannot_escape_rules_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = CleanupPlan::new();
        plan.add("../Global.list", "a.com");

        let err = cleaner(dir.path()).apply_plan(dir.path(), &plan).unwrap_err();
        assert!(matches!(err, CleanError::InvalidFileName(_)));
    }

    #[test]
    fn invalid_entry_rejects_plan_before_touching_valid_files() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules");
        fs::create_dir(&rules).unwrap();
        fs::write(rules.join("A.list"), "DOMAIN,a.com,P\n").unwrap();

        let mut plan = CleanupPlan::new();
        plan.add("A.list", "a.com");
        plan.add("../x.list", "a.com");

        let err = cleaner(dir.path()).apply_plan(&rules, &plan).unwrap_err();
        assert!(matches!(err, CleanError::InvalidFileName(ref name) if name == "../x.list"));
        assert_eq!(fs::read_to_string(rules.join("A.list")).unwrap(), "DOMAIN,a.com,P\n");
        assert!(!dir.path().join("backups").exists());
    }

    #[test]
    fn failing_file_keeps_outcomes_of_cleaned_files() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules");
        fs::create_dir(&rules).unwrap();
        fs::write(rules.join("A.list"), "DOMAIN,a.com,P\n").unwrap();
        // unreadable as a rule file
        fs::create_dir(rules.join("B.list")).unwrap();
        fs::write(rules.join("C.list"), "DOMAIN,a.com,P\n").unwrap();

        let mut plan = CleanupPlan::new();
        for file in ["A.list", "B.list", "C.list"] {
            plan.add(file, "a.com");
        }

        let outcome = cleaner(dir.path()).apply_plan(&rules, &plan).unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].status, CleanStatus::Cleaned);
        assert_eq!(outcome.total_removed(), 1);
        let backup = outcome.files[0].backup.as_ref().unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "DOMAIN,a.com,P\n");
        assert_eq!(fs::read_to_string(rules.join("A.list")).unwrap(), "");

        let failure = outcome.failure.expect("B.list should fail");
        assert_eq!(failure.path, rules.join("B.list"));
        assert!(matches!(failure.error, CleanError::Read { .. }));
        // the run stops at the failure
        assert_eq!(fs::read_to_string(rules.join("C.list")).unwrap(), "DOMAIN,a.com,P\n");
    }
}

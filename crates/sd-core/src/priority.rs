//! Priority-based retention.
//!
//! When a value lives in several files, exactly one of them keeps it. The
//! keeper is the file with the lowest rank in a [`PriorityTable`]; equal ranks
//! fall back to lexicographic file name, then full path.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detector::DuplicateReport;

/// Files that hold fine-grained, service-specific rules and should win over
/// broad catch-all lists.
pub const DEFAULT_PRIORITY_FILES: &[&str] = &[
    "adobecc.list",
    "Apple.list",
    "Claude.list",
    "Microsoft.list",
    "Netflix.list",
    "Adblock4limbo.list",
];

/// Ordered list of preferred file names. Earlier entries rank higher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityTable {
    files: Vec<String>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_FILES.iter().copied())
    }
}

impl PriorityTable {
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Rank of a file; lower is preferred. Unlisted files all share the
    /// lowest priority, `files().len()`.
    pub fn rank(&self, file: &str) -> usize {
        let name = file_name(file);
        self.files
            .iter()
            .position(|f| f == name)
            .unwrap_or(self.files.len())
    }

    /// Picks the file that should keep a duplicated value.
    pub fn select<'a, S: AsRef<str>>(&self, candidates: &'a [S]) -> Option<&'a str> {
        candidates
            .iter()
            .map(|candidate| candidate.as_ref())
            .min_by(|a, b| self.compare(a, b))
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        self.rank(a)
            .cmp(&self.rank(b))
            .then_with(|| file_name(a).cmp(file_name(b)))
            .then_with(|| a.cmp(b))
    }

    /// Builds a retention suggestion for every duplicate in the report.
    pub fn suggest(&self, report: &DuplicateReport) -> Vec<Suggestion> {
        report
            .duplicates
            .iter()
            .filter_map(|record| {
                let keep = self.select(&record.files)?;
                Some(Suggestion {
                    value: record.value.clone(),
                    keep: keep.to_string(),
                    remove_from: record
                        .files
                        .iter()
                        .filter(|f| f.as_str() != keep)
                        .cloned()
                        .collect(),
                })
            })
            .collect()
    }
}

/// Where a duplicated value should stay, and where it should go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub value: String,
    pub keep: String,
    pub remove_from: Vec<String>,
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

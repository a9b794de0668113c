//! Cross-file duplicate detection.
//!
//! Values are compared by text alone: `DOMAIN,a.com` in one file and
//! `DOMAIN-SUFFIX,a.com` in another count as the same value. A value is a
//! duplicate only when it shows up in at least two distinct files.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::parser::parse_rule_list;
use crate::types::RuleType;

/// A value found in more than one rule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub value: String,
    /// Files holding the value, in the order they were added to the detector.
    pub files: Vec<String>,
    /// Every rule type the value appeared under, across all files.
    pub rule_types: BTreeSet<RuleType>,
}

/// Result of a detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    /// Scanned files, in insertion order.
    pub files: Vec<String>,
    /// Duplicates sorted by value.
    pub duplicates: Vec<DuplicateRecord>,
}

impl DuplicateReport {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    pub fn get(&self, value: &str) -> Option<&DuplicateRecord> {
        self.duplicates
            .binary_search_by(|record| record.value.as_str().cmp(value))
            .ok()
            .map(|idx| &self.duplicates[idx])
    }
}

#[derive(Debug, Default)]
struct Sightings {
    files: Vec<usize>,
    rule_types: BTreeSet<RuleType>,
}

/// Accumulates rule files and reports values shared between them.
#[derive(Debug, Default)]
pub struct DuplicateDetector {
    files: Vec<String>,
    values: BTreeMap<String, Sightings>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule file's contents. Adding the same name twice merges both
    /// contents into one file.
    pub fn add_file(&mut self, name: impl Into<String>, text: &str) {
        let name = name.into();
        let file_idx = match self.files.iter().position(|f| *f == name) {
            Some(idx) => idx,
            None => {
                self.files.push(name);
                self.files.len() - 1
            }
        };

        let mut entries = 0usize;
        for entry in parse_rule_list(text) {
            entries += 1;
            let sightings = self.values.entry(entry.value).or_default();
            sightings.rule_types.insert(entry.rule_type);
            if !sightings.files.contains(&file_idx) {
                sightings.files.push(file_idx);
            }
        }

        log::debug!("indexed {} rule entries from {}", entries, self.files[file_idx]);
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of distinct values seen across all files.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Builds the duplicate report. Does not consume the detector, so calling
    /// it repeatedly yields identical reports.
    pub fn report(&self) -> DuplicateReport {
        let duplicates = self
            .values
            .iter()
            .filter(|(_, sightings)| sightings.files.len() > 1)
            .map(|(value, sightings)| DuplicateRecord {
                value: value.clone(),
                files: sightings
                    .files
                    .iter()
                    .map(|&idx| self.files[idx].clone())
                    .collect(),
                rule_types: sightings.rule_types.clone(),
            })
            .collect();

        DuplicateReport {
            files: self.files.clone(),
            duplicates,
        }
    }
}

/// Convenience wrapper: detects duplicates among `(name, contents)` pairs.
pub fn find_duplicates<'a, I>(files: I) -> DuplicateReport
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut detector = DuplicateDetector::new();
    for (name, text) in files {
        detector.add_file(name, text);
    }
    detector.report()
}

//! Cleanup plans: which values to drop from which rule file.
//!
//! Plans are plain data. They are either derived from priority suggestions or
//! written by hand and loaded from JSON, e.g.
//!
//! ```json
//! {
//!   "backup_label": "final_backup",
//!   "removals": { "Global.list": ["45.57.0.0/17"] }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::priority::Suggestion;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupPlan {
    /// Overrides the configured backup label for files touched by this plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_label: Option<String>,
    /// File name -> values to remove from it.
    #[serde(default)]
    pub removals: BTreeMap<String, BTreeSet<String>>,
}

impl CleanupPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every `remove_from` entry of the suggestions.
    pub fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        let mut plan = Self::new();
        for suggestion in suggestions {
            for file in &suggestion.remove_from {
                plan.add(file.clone(), suggestion.value.clone());
            }
        }
        plan
    }

    pub fn add(&mut self, file: impl Into<String>, value: impl Into<String>) {
        self.removals
            .entry(file.into())
            .or_default()
            .insert(value.into());
    }

    pub fn with_backup_label(mut self, label: impl Into<String>) -> Self {
        self.backup_label = Some(label.into());
        self
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.removals.keys().map(String::as_str)
    }

    pub fn values_for(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.removals.get(file)
    }

    /// Total number of (file, value) pairs in the plan.
    pub fn removal_count(&self) -> usize {
        self.removals.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.removal_count() == 0
    }
}

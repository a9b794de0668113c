use serde::Serialize;

use sd_cleaner::{CleanOutcome, CleanStatus, PlanOutcome};
use sd_core::{DuplicateReport, Suggestion};

#[derive(Debug, Serialize)]
pub struct ScanOutput<'a> {
    pub files: &'a [String],
    pub duplicates: Vec<ScanEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ScanEntry<'a> {
    pub value: &'a str,
    pub rule_types: Vec<String>,
    pub files: &'a [String],
    pub keep: &'a str,
    pub remove_from: &'a [String],
}

pub fn scan_output<'a>(report: &'a DuplicateReport, suggestions: &'a [Suggestion]) -> ScanOutput<'a> {
    let duplicates = report
        .duplicates
        .iter()
        .zip(suggestions)
        .map(|(record, suggestion)| ScanEntry {
            value: &record.value,
            rule_types: record.rule_types.iter().map(|t| t.to_string()).collect(),
            files: &record.files,
            keep: &suggestion.keep,
            remove_from: &suggestion.remove_from,
        })
        .collect();

    ScanOutput {
        files: &report.files,
        duplicates,
    }
}

pub fn render_scan(output: &ScanOutput<'_>) -> String {
    let mut text = String::new();
    text.push_str(&format!("Scanned {} rule files\n", output.files.len()));

    if output.duplicates.is_empty() {
        text.push_str("No duplicate values found\n");
        return text;
    }

    text.push_str(&format!("Found {} duplicate values:\n\n", output.duplicates.len()));
    for entry in &output.duplicates {
        text.push_str(&format!("Value: {} ({})\n", entry.value, entry.rule_types.join(", ")));
        text.push_str(&format!("  Found in:  {}\n", entry.files.join(", ")));
        text.push_str(&format!("  Keep in:   {}\n", entry.keep));
        text.push('\n');
    }
    text
}

pub fn render_outcome(outcome: &CleanOutcome) -> String {
    let name = outcome
        .path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();

    match outcome.status {
        CleanStatus::Skipped => format!("  {}: not found, skipped", name),
        CleanStatus::DryRun => format!("  {}: would remove {} lines", name, outcome.removed_count()),
        CleanStatus::Cleaned | CleanStatus::Unchanged => {
            let backup = outcome
                .backup
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            format!(
                "  {}: removed {} lines (backup: {})",
                name,
                outcome.removed_count(),
                backup
            )
        }
    }
}

pub fn render_plan_outcome(outcome: &PlanOutcome) -> String {
    let mut lines: Vec<String> = outcome.files.iter().map(render_outcome).collect();
    if let Some(failure) = &outcome.failure {
        lines.push(format!("  {}: failed, remaining files not attempted", failure.path.display()));
    }
    lines.push(format!("Total removed: {}", outcome.total_removed()));
    lines.join("\n")
}

//! Line-local parsing of Surge rule lines.

use crate::types::{RuleEntry, RuleType};

/// Parses every line of a rule list, skipping lines that carry no rule.
pub fn parse_rule_list(text: &str) -> Vec<RuleEntry> {
    text.lines().filter_map(parse_rule_line).collect()
}

/// Parses a single rule line.
///
/// Blank lines, `#` comments, unsupported rule types and malformed lines all
/// return `None`. Callers that rewrite files keep such lines untouched.
pub fn parse_rule_line(raw_line: &str) -> Option<RuleEntry> {
    let line = raw_line.trim();
    if line.is_empty() || is_comment_line(line) {
        return None;
    }

    for rule_type in RuleType::ALL {
        if let Some((value, policy)) = split_typed_fields(line, rule_type) {
            return Some(RuleEntry {
                rule_type,
                value: value.to_string(),
                policy: policy.to_string(),
            });
        }
    }

    None
}

/// Returns the value of a rule line, if it has one.
pub fn rule_value(raw_line: &str) -> Option<String> {
    parse_rule_line(raw_line).map(|entry| entry.value)
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('#')
}

/// Matches `KEYWORD,value,rest`. The value must be non-empty and must be
/// terminated by a comma; `rest` may be empty.
fn split_typed_fields(line: &str, rule_type: RuleType) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(rule_type.keyword())?.strip_prefix(',')?;
    let (value, policy) = rest.split_once(',')?;
    if value.is_empty() {
        return None;
    }
    Some((value, policy))
}

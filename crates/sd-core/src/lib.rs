//! surgedup Core Library
//!
//! Pure logic for keeping a Surge rule-set repository free of values that are
//! listed in more than one `.list` file. Nothing in this crate touches the
//! filesystem; see `sd-cleaner` for that.
//!
//! # Modules
//!
//! - `types`: Rule types and parsed rule entries
//! - `parser`: Line-local rule parsing
//! - `detector`: Cross-file duplicate detection
//! - `priority`: Priority table and retention suggestions
//! - `plan`: Cleanup plans (file -> values to remove)

pub mod types;
pub mod parser;
pub mod detector;
pub mod priority;
pub mod plan;

// Re-export commonly used types
pub use types::{RuleEntry, RuleType};
pub use parser::{parse_rule_line, parse_rule_list, rule_value};
pub use detector::{find_duplicates, DuplicateDetector, DuplicateRecord, DuplicateReport};
pub use priority::{PriorityTable, Suggestion, DEFAULT_PRIORITY_FILES};
pub use plan::CleanupPlan;

//! Core type definitions for surgedup
//!
//! These types mirror the Surge rule-list line format
//! `TYPE,value,policy[,options]` for the rule types we deduplicate.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Rule Types
// =============================================================================

/// Rule types that carry a comparable value.
///
/// Variants are declared in matching order: the parser tries them top to
/// bottom and stops at the first hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleType {
    /// `DOMAIN,host,policy` - exact host match
    #[serde(rename = "DOMAIN")]
    Domain,
    /// `DOMAIN-SUFFIX,host,policy` - host and all subdomains
    #[serde(rename = "DOMAIN-SUFFIX")]
    DomainSuffix,
    /// `DOMAIN-KEYWORD,word,policy` - substring of the host
    #[serde(rename = "DOMAIN-KEYWORD")]
    DomainKeyword,
    /// `IP-CIDR,a.b.c.d/n,policy`
    #[serde(rename = "IP-CIDR")]
    IpCidr,
    /// `IP-CIDR6,prefix/n,policy`
    #[serde(rename = "IP-CIDR6")]
    IpCidr6,
}

impl RuleType {
    /// All rule types in matching order.
    pub const ALL: [RuleType; 5] = [
        RuleType::Domain,
        RuleType::DomainSuffix,
        RuleType::DomainKeyword,
        RuleType::IpCidr,
        RuleType::IpCidr6,
    ];

    /// Keyword as written in the first field of a rule line.
    pub const fn keyword(self) -> &'static str {
        match self {
            RuleType::Domain => "DOMAIN",
            RuleType::DomainSuffix => "DOMAIN-SUFFIX",
            RuleType::DomainKeyword => "DOMAIN-KEYWORD",
            RuleType::IpCidr => "IP-CIDR",
            RuleType::IpCidr6 => "IP-CIDR6",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// =============================================================================
// Rule Entries
// =============================================================================

/// A parsed rule line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleEntry {
    pub rule_type: RuleType,
    /// Second field, compared verbatim across files.
    pub value: String,
    /// Everything after the value's terminating comma. Not used for comparison.
    pub policy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_unique_and_match_display() {
        for (i, t) in RuleType::ALL.iter().enumerate() {
            assert_eq!(t.to_string(), t.keyword());
            assert!(RuleType::ALL[i + 1..].iter().all(|other| other.keyword() != t.keyword()));
        }
    }

    #[test]
    fn serde_uses_surge_keywords() {
        let json = serde_json::to_string(&RuleType::DomainSuffix).unwrap();
        assert_eq!(json, "\"DOMAIN-SUFFIX\"");
        let back: RuleType = serde_json::from_str("\"IP-CIDR6\"").unwrap();
        assert_eq!(back, RuleType::IpCidr6);
    }
}

//! Rule Schema Types
//!
//! Identity metadata every rule plugin declares, and the raw violation
//! records its checks produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a rule or check.
///
/// Variants are declared from strictest to weakest, so the derived `Ord`
/// sorts `Must` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[serde(alias = "must")]
    Must,
    #[serde(alias = "should")]
    Should,
    #[serde(alias = "may")]
    May,
    #[serde(alias = "hint")]
    Hint,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Must, Severity::Should, Severity::May, Severity::Hint];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Must => "MUST",
            Severity::Should => "SHOULD",
            Severity::May => "MAY",
            Severity::Hint => "HINT",
        }
    }

    /// True when `self` ranks strictly above `other` (MUST > SHOULD > MAY > HINT)
    pub fn is_stricter_than(&self, other: Severity) -> bool {
        *self < other
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown severity '{}', expected one of MUST, SHOULD, MAY, HINT",
                    s
                )
            })
    }
}

/// A named, versioned collection of rules sharing a documentation site
#[derive(Debug, PartialEq, Eq)]
pub struct RuleSet {
    pub id: &'static str,
    pub version: &'static str,
    /// Documentation link template, `{id}` is replaced by the rule id
    pub url_template: &'static str,
}

impl RuleSet {
    pub const fn new(id: &'static str, version: &'static str, url_template: &'static str) -> Self {
        Self {
            id,
            version,
            url_template,
        }
    }

    /// Documentation URL for one rule of this set
    pub fn url(&self, rule: &RuleDescriptor) -> String {
        self.url_template.replace("{id}", rule.id)
    }

    /// Landing page of the rule set (template with the id placeholder dropped)
    pub fn base_url(&self) -> String {
        self.url_template.replace("{id}", "")
    }
}

impl fmt::Display for RuleSet {
    /// `id version - landing page`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.id, self.version, self.base_url())
    }
}

/// Declared identity of a rule. Immutable once registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    pub id: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    pub rule_set: &'static RuleSet,
}

impl RuleDescriptor {
    pub fn documentation_url(&self) -> String {
        self.rule_set.url(self)
    }
}

/// Raw output of a check: what is wrong and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub description: String,
    /// JSON pointer of the offending node
    pub pointer: String,
}

impl Violation {
    pub fn new(description: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            pointer: pointer.into(),
        }
    }
}

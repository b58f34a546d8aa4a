//! Skip-list filtering of rule types.

use std::collections::BTreeSet;

use crate::rule::{RuleRegistry, RuleType};

/// Rules excluded from a run, named by simple type name or rule id
#[derive(Debug, Clone, Default)]
pub struct SkipFilter {
    names: BTreeSet<String>,
}

impl SkipFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_skipped(&self, rule: &RuleType) -> bool {
        self.names.contains(rule.name) || self.names.contains(rule.descriptor.id)
    }

    /// Entries that match no registered rule
    pub fn unknown<'a>(&'a self, registry: &RuleRegistry) -> Vec<&'a str> {
        self.names
            .iter()
            .filter(|name| registry.get(name).is_none() && registry.find_by_id(name).is_none())
            .map(String::as_str)
            .collect()
    }
}

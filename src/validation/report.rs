//! Results and Aggregation
//!
//! The public output unit of a run and the canonical ordering applied to it.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::document::Location;
use crate::rule::Severity;

/// One reported violation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    pub rule_id: String,
    pub documentation_url: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub pointer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Simple type name of the rule that produced the result
    pub rule_type: String,
    /// Name of the check that produced the result
    pub check: String,
}

impl fmt::Display for LintResult {
    /// `id - SEVERITY - Type - description - pointer - line:column`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {} - {} - ",
            self.rule_id, self.severity, self.rule_type, self.description, self.pointer
        )?;
        match &self.location {
            Some(location) => write!(f, "{}", location),
            None => f.write_str("n/a"),
        }
    }
}

/// Canonical output order: severity (MUST first), rule id, pointer
pub fn canonical_order(a: &LintResult, b: &LintResult) -> Ordering {
    a.severity
        .cmp(&b.severity)
        .then_with(|| a.rule_id.cmp(&b.rule_id))
        .then_with(|| a.pointer.cmp(&b.pointer))
}

/// Results grouped by severity, canonical order kept inside each group
pub type SeverityGroups<'a> = BTreeMap<Severity, Vec<&'a LintResult>>;

/// Orders collected results and wraps them into a [`Report`]
pub struct SeverityAggregator;

impl SeverityAggregator {
    pub fn aggregate(mut results: Vec<LintResult>, ignored: usize) -> Report {
        // Stable: equal keys keep evaluation order
        results.sort_by(canonical_order);
        Report { results, ignored }
    }
}

/// Final, canonically ordered output of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    results: Vec<LintResult>,
    ignored: usize,
}

impl Report {
    pub fn results(&self) -> &[LintResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Violations dropped because of ignore markers in the document
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    pub fn by_severity(&self) -> SeverityGroups<'_> {
        let mut groups: SeverityGroups<'_> = BTreeMap::new();
        for result in &self.results {
            groups.entry(result.severity).or_default().push(result);
        }
        groups
    }

    /// Strictest of the given severities that has at least one result
    pub fn first_failing(&self, fail_on: &[Severity]) -> Option<(Severity, usize)> {
        Severity::ALL
            .into_iter()
            .filter(|sev| fail_on.contains(sev))
            .map(|sev| (sev, self.count(sev)))
            .find(|(_, count)| *count > 0)
    }

    /// Diagnostic line for every result, in output order
    pub fn lines(&self) -> Vec<String> {
        self.results.iter().map(ToString::to_string).collect()
    }
}

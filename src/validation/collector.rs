//! Violation Collector
//!
//! Turns raw violations into [`LintResult`]s: drops the ones the document
//! marks as ignored and resolves source locations on a best-effort basis.

use crate::document::{Context, SourceMap, WILDCARD};
use crate::rule::{CheckDescriptor, Violation};

use super::report::LintResult;

pub struct ViolationCollector<'a> {
    context: &'a Context,
    source_map: Option<&'a SourceMap>,
    ignored: usize,
}

impl<'a> ViolationCollector<'a> {
    pub fn new(context: &'a Context, source_map: Option<&'a SourceMap>) -> Self {
        Self {
            context,
            source_map,
            ignored: 0,
        }
    }

    /// Normalize one violation; `None` when an ignore marker covers it
    pub fn collect(&mut self, check: &CheckDescriptor, violation: Violation) -> Option<LintResult> {
        let rule_id = check.rule.id;
        if self.context.is_ignored(&violation.pointer, rule_id)
            || self.context.is_ignored(&violation.pointer, WILDCARD)
        {
            log::info!(
                "Ignore violation, rule = {}, at {}",
                rule_id,
                violation.pointer
            );
            self.ignored += 1;
            return None;
        }

        let location = self.source_map.and_then(|map| {
            let found = map.locate(&violation.pointer);
            if found.is_none() {
                log::debug!("No source location for pointer '{}'", violation.pointer);
            }
            found
        });

        Some(LintResult {
            rule_id: rule_id.to_string(),
            documentation_url: check.rule.documentation_url(),
            title: check.rule.title.to_string(),
            description: violation.description,
            severity: check.severity,
            pointer: violation.pointer,
            location,
            rule_type: check.rule_type.to_string(),
            check: check.name.to_string(),
        })
    }

    /// Number of violations dropped so far
    pub fn ignored(&self) -> usize {
        self.ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Location;
    use crate::rule::{RuleDescriptor, RuleSet, Severity};
    use serde_json::json;

    static TEST_SET: RuleSet = RuleSet::new("test", "1.0", "https://example.com/#{id}");

    fn check() -> CheckDescriptor {
        CheckDescriptor {
            rule: RuleDescriptor {
                id: "120",
                severity: Severity::Should,
                title: "Array names should be pluralized",
                rule_set: &TEST_SET,
            },
            rule_type: "PluralizeNamesForArraysRule",
            name: "check_array_names",
            severity: Severity::May,
        }
    }

    #[test]
    fn test_collect_builds_result() {
        let context = Context::new(json!({"paths": {}}));
        let map = SourceMap::parse("openapi: 3.0.0\npaths: {}\n");
        let mut collector = ViolationCollector::new(&context, Some(&map));

        let result = collector
            .collect(&check(), Violation::new("singular", "/paths"))
            .unwrap();
        assert_eq!(result.rule_id, "120");
        assert_eq!(result.documentation_url, "https://example.com/#120");
        assert_eq!(result.severity, Severity::May);
        assert_eq!(result.location, Some(Location { line: 2, column: 1 }));
        assert_eq!(result.rule_type, "PluralizeNamesForArraysRule");
    }

    #[test]
    fn test_unresolved_location_is_soft() {
        let context = Context::new(json!({}));
        let map = SourceMap::parse("openapi: 3.0.0\n");
        let mut collector = ViolationCollector::new(&context, Some(&map));
        let result = collector.collect(&check(), Violation::new("x", "/missing")).unwrap();
        assert_eq!(result.location, None);

        let mut collector = ViolationCollector::new(&context, None);
        let result = collector.collect(&check(), Violation::new("x", "/openapi")).unwrap();
        assert_eq!(result.location, None);
        assert_eq!(result.pointer, "/openapi");
    }

    #[test]
    fn test_ignored_by_rule_id_and_wildcard() {
        let context = Context::new(json!({
            "a": {"x-zally-ignore": ["120"], "b": 1},
            "c": {"x-zally-ignore": ["*"]},
            "d": {"x-zally-ignore": ["999"]}
        }));
        let mut collector = ViolationCollector::new(&context, None);

        assert!(collector.collect(&check(), Violation::new("x", "/a/b")).is_none());
        assert!(collector.collect(&check(), Violation::new("x", "/c")).is_none());
        assert!(collector.collect(&check(), Violation::new("x", "/d")).is_some());
        assert_eq!(collector.ignored(), 2);
    }
}

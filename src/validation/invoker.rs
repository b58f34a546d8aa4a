//! Check Invocation
//!
//! Runs every check of a rule instance exactly once against the shared
//! context, in declaration order.

use crate::document::Context;
use crate::error::LintError;
use crate::rule::{CheckDescriptor, RuleInstance, Violation};

/// Raw output of one check
pub type CheckOutput = (CheckDescriptor, Vec<Violation>);

/// Invoke all checks of one rule instance.
///
/// A check returning `Err` is a defective plugin: the error aborts the run
/// instead of becoming a result.
pub fn invoke_checks(instance: &RuleInstance, context: &Context) -> Result<Vec<CheckOutput>, LintError> {
    let rule_type = &instance.rule_type;
    let checks = instance.rule().checks();
    let mut outputs = Vec::with_capacity(checks.len());

    for check in &checks {
        let descriptor = CheckDescriptor::new(rule_type.descriptor, rule_type.name, check);
        log::debug!(
            "Running check {}::{} ({})",
            rule_type.name,
            check.name,
            rule_type.descriptor.id
        );
        let violations = check.run(context).map_err(|e| LintError::CheckFailed {
            rule_id: rule_type.descriptor.id.to_string(),
            rule: rule_type.name.to_string(),
            check: check.name.to_string(),
            source: e.into(),
        })?;
        outputs.push((descriptor, violations));
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Check, Rule, RuleDescriptor, RuleSet, RuleType, Severity};
    use anyhow::anyhow;
    use serde_json::json;
    use std::cell::Cell;

    static TEST_SET: RuleSet = RuleSet::new("test", "1.0", "https://example.com/#{id}");

    const DESCRIPTOR: RuleDescriptor = RuleDescriptor {
        id: "42",
        severity: Severity::Should,
        title: "Test rule",
        rule_set: &TEST_SET,
    };

    struct TwoChecks;

    impl Rule for TwoChecks {
        fn checks(&self) -> Vec<Check<'_>> {
            vec![
                Check::new("single", Severity::Must, |_| {
                    Ok(vec![Violation::new("one", "/a")])
                }),
                Check::new("nothing", Severity::Should, |_| Ok(Vec::new())),
            ]
        }
    }

    struct Defective;

    impl Rule for Defective {
        fn checks(&self) -> Vec<Check<'_>> {
            vec![Check::new("explodes", Severity::Should, |_| {
                Err(anyhow!("unexpected schema shape"))
            })]
        }
    }

    fn instance(name: &'static str, rule: Box<dyn Rule>) -> RuleInstance {
        RuleInstance::new(RuleType::new(name, DESCRIPTOR), rule)
    }

    #[test]
    fn test_outputs_follow_declaration_order() {
        let context = Context::new(json!({}));
        let outputs = invoke_checks(&instance("TwoChecks", Box::new(TwoChecks)), &context).unwrap();

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].0.name, "single");
        assert_eq!(outputs[0].0.severity, Severity::Must);
        assert_eq!(outputs[0].0.rule_type, "TwoChecks");
        assert_eq!(outputs[0].1.len(), 1);
        assert_eq!(outputs[1].0.name, "nothing");
        assert!(outputs[1].1.is_empty());
    }

    #[test]
    fn test_check_error_is_fatal() {
        let context = Context::new(json!({}));
        let err = invoke_checks(&instance("Defective", Box::new(Defective)), &context).unwrap_err();

        match err {
            LintError::CheckFailed { rule_id, rule, check, .. } => {
                assert_eq!(rule_id, "42");
                assert_eq!(rule, "Defective");
                assert_eq!(check, "explodes");
            }
            other => panic!("Expected check failure, got {}", other),
        }
    }

    #[test]
    fn test_each_check_runs_once() {
        let calls = Cell::new(0);
        let check = Check::new("count", Severity::Hint, |_| {
            calls.set(calls.get() + 1);
            Ok(Vec::new())
        });
        let context = Context::new(json!({}));
        check.run(&context).unwrap();
        assert_eq!(calls.get(), 1);
    }
}

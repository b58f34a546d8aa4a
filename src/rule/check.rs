//! Check Operations
//!
//! A rule instance exposes zero or more checks. Each check receives the
//! shared read-only [`Context`] and yields zero or more violations.

use std::fmt;

use anyhow::Result;

use super::schema::{RuleDescriptor, Severity, Violation};
use crate::document::Context;

/// Boxed check body borrowing the rule instance it belongs to
pub type CheckFn<'r> = Box<dyn Fn(&Context) -> Result<Vec<Violation>> + 'r>;

/// One exposed check operation of a rule instance
pub struct Check<'r> {
    pub name: &'static str,
    pub severity: Severity,
    run: CheckFn<'r>,
}

impl<'r> Check<'r> {
    pub fn new<F>(name: &'static str, severity: Severity, run: F) -> Self
    where
        F: Fn(&Context) -> Result<Vec<Violation>> + 'r,
    {
        Self {
            name,
            severity,
            run: Box::new(run),
        }
    }

    /// Run the check body once against the context
    pub fn run(&self, context: &Context) -> Result<Vec<Violation>> {
        (self.run)(context)
    }
}

impl fmt::Debug for Check<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// Capability every rule plugin implements.
///
/// Checks must treat the context as read-only; the same instance may be
/// invoked from a worker thread when parallel evaluation is enabled.
pub trait Rule: Send + Sync {
    /// Checks in declaration order
    fn checks(&self) -> Vec<Check<'_>>;
}

/// Identity of one check of one rule, attached to every result it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckDescriptor {
    pub rule: RuleDescriptor,
    /// Simple type name of the owning rule
    pub rule_type: &'static str,
    pub name: &'static str,
    /// Severity declared on the check, overriding the rule default
    pub severity: Severity,
}

impl CheckDescriptor {
    pub fn new(rule: RuleDescriptor, rule_type: &'static str, check: &Check<'_>) -> Self {
        Self {
            rule,
            rule_type,
            name: check.name,
            severity: check.severity,
        }
    }
}

//! Validation Engine
//!
//! Drives one run: discovers and instantiates the registered rules, invokes
//! every check against the shared context and turns the raw violations into
//! a canonically ordered [`Report`].

use rayon::prelude::*;

use crate::config::LintConfig;
use crate::document::{Context, Document};
use crate::error::LintError;
use crate::rule::{RuleInstance, RuleInstantiator, RuleRegistry, RuleType};

use super::collector::ViolationCollector;
use super::invoker::{CheckOutput, invoke_checks};
use super::report::{Report, SeverityAggregator};
use super::skip::SkipFilter;

/// Rule instances ready to validate documents
#[derive(Debug)]
pub struct Linter {
    instances: Vec<RuleInstance>,
    skipped: Vec<RuleType>,
    parallel: bool,
}

impl Linter {
    /// Discover the registered rules and build one instance per rule type
    /// that is not skipped.
    ///
    /// Discovery and instantiation failures abort before anything runs.
    pub fn new(registry: &RuleRegistry, config: &LintConfig) -> Result<Self, LintError> {
        let discovered = registry.discover()?;

        let skip = SkipFilter::new(config.skip_rules.iter().cloned());
        for name in skip.unknown(registry) {
            log::warn!("Requested to skip rule '{}', but no such rule is known.", name);
        }

        let instantiator = RuleInstantiator::new(config.defaults.clone(), &config.rules)?;
        let mut instances = Vec::with_capacity(discovered.len());
        let mut skipped = Vec::new();
        for rule_type in discovered {
            if skip.is_skipped(rule_type) {
                log::debug!("Skipping rule {}", rule_type.name);
                skipped.push(rule_type.clone());
                continue;
            }
            instances.push(instantiator.create(rule_type)?);
        }

        Ok(Self {
            instances,
            skipped,
            parallel: config.parallel,
        })
    }

    /// Evaluate rule instances on a worker pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Active rule instances in discovery order
    pub fn rules(&self) -> &[RuleInstance] {
        &self.instances
    }

    pub fn skipped(&self) -> &[RuleType] {
        &self.skipped
    }

    /// Run every check once and aggregate the results.
    ///
    /// The output order does not depend on `parallel`.
    pub fn validate(&self, document: &Document) -> Result<Report, LintError> {
        let context = document.context();
        let outputs = self.invoke_all(&context)?;

        let total: usize = outputs.iter().map(|(_, found)| found.len()).sum();
        let source_map = if total > 0 { document.source_map() } else { None };

        let mut collector = ViolationCollector::new(&context, source_map.as_ref());
        let mut results = Vec::with_capacity(total);
        for (check, violations) in outputs {
            for violation in violations {
                if let Some(result) = collector.collect(&check, violation) {
                    results.push(result);
                }
            }
        }

        let report = SeverityAggregator::aggregate(results, collector.ignored());
        log::info!(
            "Validated with {} rule(s): {} result(s), {} ignored",
            self.instances.len(),
            report.len(),
            report.ignored()
        );
        Ok(report)
    }

    fn invoke_all(&self, context: &Context) -> Result<Vec<CheckOutput>, LintError> {
        let per_rule: Vec<Vec<CheckOutput>> = if self.parallel {
            self.instances
                .par_iter()
                .map(|instance| invoke_checks(instance, context))
                .collect::<Result<_, _>>()?
        } else {
            self.instances
                .iter()
                .map(|instance| invoke_checks(instance, context))
                .collect::<Result<_, _>>()?
        };
        Ok(per_rule.into_iter().flatten().collect())
    }
}

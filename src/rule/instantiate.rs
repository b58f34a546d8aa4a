//! Rule Instantiation
//!
//! Builds one runtime instance per rule type, handing configurable rules
//! their merged configuration section.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::check::Rule;
use super::config::RuleConfig;
use super::registry::RuleType;
use crate::error::LintError;

/// A constructed rule, alive for one validation run
pub struct RuleInstance {
    pub rule_type: RuleType,
    rule: Box<dyn Rule>,
}

impl RuleInstance {
    pub fn new(rule_type: RuleType, rule: Box<dyn Rule>) -> Self {
        Self { rule_type, rule }
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    pub fn name(&self) -> &'static str {
        self.rule_type.name
    }
}

impl std::fmt::Debug for RuleInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleInstance")
            .field("rule_type", &self.rule_type.name)
            .field("id", &self.rule_type.descriptor.id)
            .finish_non_exhaustive()
    }
}

/// Merges global and per-rule settings and invokes rule constructors
#[derive(Debug, Clone, Default)]
pub struct RuleInstantiator {
    defaults: Map<String, Value>,
    sections: BTreeMap<String, Map<String, Value>>,
}

impl RuleInstantiator {
    /// Build from global defaults and per-rule sections keyed by type name.
    ///
    /// Every section must be a table; anything else is a configuration error.
    pub fn new(
        defaults: Map<String, Value>,
        sections: &BTreeMap<String, Value>,
    ) -> Result<Self, LintError> {
        let mut tables = BTreeMap::new();
        for (rule, section) in sections {
            match section {
                Value::Object(table) => {
                    tables.insert(rule.clone(), table.clone());
                }
                Value::Null => {
                    tables.insert(rule.clone(), Map::new());
                }
                other => {
                    return Err(LintError::MalformedRuleConfig {
                        rule: rule.clone(),
                        found: value_kind(other),
                    });
                }
            }
        }
        Ok(Self {
            defaults,
            sections: tables,
        })
    }

    /// Merged configuration for one rule type, empty when nothing is configured
    pub fn config_for(&self, rule_name: &str) -> RuleConfig {
        RuleConfig::merged(&self.defaults, self.sections.get(rule_name))
    }

    /// Construct a rule, preferring its configuration-accepting constructor
    pub fn create(&self, rule_type: &RuleType) -> Result<RuleInstance, LintError> {
        let built = if let Some(constructor) = rule_type.config_constructor() {
            let config = self.config_for(rule_type.name);
            log::debug!(
                "Creating rule {} with {} configuration key(s)",
                rule_type.name,
                config.values().len()
            );
            constructor(&config)
        } else if let Some(constructor) = rule_type.plain_constructor() {
            log::debug!("Creating rule {}", rule_type.name);
            constructor()
        } else {
            return Err(LintError::UnresolvableRule(rule_type.name.to_string()));
        };

        let rule = built.map_err(|e| LintError::Instantiation {
            rule: rule_type.name.to_string(),
            source: e.into(),
        })?;
        Ok(RuleInstance::new(rule_type.clone(), rule))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a table",
    }
}

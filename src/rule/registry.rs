//! Rule Registry
//!
//! Explicit registration table of the rule plugins available to one run.
//! Replaces runtime type scanning: every rule type is registered up front
//! with its declared identity and its constructors.

use std::collections::{HashMap, HashSet};

use anyhow::Result;

use super::check::Rule;
use super::config::RuleConfig;
use super::schema::RuleDescriptor;
use crate::error::LintError;

/// No-argument constructor shape
pub type PlainConstructor = fn() -> Result<Box<dyn Rule>>;

/// Constructor shape accepting the rule's configuration
pub type ConfiguredConstructor = fn(&RuleConfig) -> Result<Box<dyn Rule>>;

/// A registered rule type: declared identity plus how to build it
#[derive(Debug, Clone)]
pub struct RuleType {
    /// Simple type name; configuration and skip-lists refer to rules by it
    pub name: &'static str,
    pub descriptor: RuleDescriptor,
    plain: Option<PlainConstructor>,
    configured: Option<ConfiguredConstructor>,
}

impl RuleType {
    pub fn new(name: &'static str, descriptor: RuleDescriptor) -> Self {
        Self {
            name,
            descriptor,
            plain: None,
            configured: None,
        }
    }

    pub fn with_plain_constructor(mut self, constructor: PlainConstructor) -> Self {
        self.plain = Some(constructor);
        self
    }

    pub fn with_config_constructor(mut self, constructor: ConfiguredConstructor) -> Self {
        self.configured = Some(constructor);
        self
    }

    pub fn plain_constructor(&self) -> Option<PlainConstructor> {
        self.plain
    }

    pub fn config_constructor(&self) -> Option<ConfiguredConstructor> {
        self.configured
    }

    pub fn is_constructible(&self) -> bool {
        self.plain.is_some() || self.configured.is_some()
    }

    /// One-line summary: `id - Type - SEVERITY - title - url`
    pub fn describe(&self) -> String {
        format!(
            "{} - {} - {} - {} - {}",
            self.descriptor.id,
            self.name,
            self.descriptor.severity,
            self.descriptor.title,
            self.descriptor.documentation_url()
        )
    }
}

/// Registration table scoped to the caller, never process-wide
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<RuleType>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Registry preloaded with the bundled rule set
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        crate::rules::register_builtin_rules(&mut registry);
        registry
    }

    /// Add a rule type; registration order is discovery order
    pub fn register(&mut self, rule: RuleType) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule type by its simple name
    pub fn get(&self, name: &str) -> Option<&RuleType> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Look up a rule type by its declared id
    pub fn find_by_id(&self, id: &str) -> Option<&RuleType> {
        self.rules.iter().find(|r| r.descriptor.id == id)
    }

    /// Validate the registered rules and return them in discovery order.
    ///
    /// Fails on the first rule type that has no constructor, or whose id or
    /// name collides with an earlier registration.
    pub fn discover(&self) -> Result<Vec<&RuleType>, LintError> {
        let mut by_id: HashMap<&str, &str> = HashMap::new();
        let mut names: HashSet<&str> = HashSet::new();
        let mut discovered = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            log::debug!("Loading rule {}", rule.name);

            if !rule.is_constructible() {
                return Err(LintError::UnresolvableRule(rule.name.to_string()));
            }
            if !names.insert(rule.name) {
                return Err(LintError::DuplicateRuleType(rule.name.to_string()));
            }
            if let Some(first) = by_id.insert(rule.descriptor.id, rule.name) {
                return Err(LintError::DuplicateRuleId {
                    id: rule.descriptor.id.to_string(),
                    first: first.to_string(),
                    second: rule.name.to_string(),
                });
            }
            discovered.push(rule);
        }

        Ok(discovered)
    }

    /// Sorted summary lines for every registered rule
    pub fn describe(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.rules.iter().map(RuleType::describe).collect();
        lines.sort();
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Check, RuleSet, Severity};

    static TEST_SET: RuleSet = RuleSet::new("test", "1.0", "https://example.com/#{id}");

    struct Empty;

    impl Rule for Empty {
        fn checks(&self) -> Vec<Check<'_>> {
            Vec::new()
        }
    }

    fn descriptor(id: &'static str) -> RuleDescriptor {
        RuleDescriptor {
            id,
            severity: Severity::May,
            title: "Test rule",
            rule_set: &TEST_SET,
        }
    }

    fn plain(name: &'static str, id: &'static str) -> RuleType {
        RuleType::new(name, descriptor(id)).with_plain_constructor(|| Ok(Box::new(Empty)))
    }

    #[test]
    fn test_registry_creation() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.discover().unwrap().is_empty());
    }

    #[test]
    fn test_discover_keeps_registration_order() {
        let mut registry = RuleRegistry::new();
        registry.register(plain("Zeta", "2"));
        registry.register(plain("Alpha", "1"));

        let names: Vec<_> = registry.discover().unwrap().iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(registry.get("Alpha").unwrap().descriptor.id, "1");
        assert_eq!(registry.find_by_id("2").unwrap().name, "Zeta");
    }

    #[test]
    fn test_unconstructible_rule_is_fatal() {
        let mut registry = RuleRegistry::new();
        registry.register(RuleType::new("Broken", descriptor("9")));

        let err = registry.discover().unwrap_err();
        assert!(matches!(err, LintError::UnresolvableRule(ref name) if name == "Broken"));
        assert!(err.is_startup_error());
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let mut registry = RuleRegistry::new();
        registry.register(plain("First", "7"));
        registry.register(plain("Second", "7"));

        match registry.discover() {
            Err(LintError::DuplicateRuleId { id, first, second }) => {
                assert_eq!(id, "7");
                assert_eq!(first, "First");
                assert_eq!(second, "Second");
            }
            other => panic!("Expected duplicate id error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_duplicate_name_is_fatal() {
        let mut registry = RuleRegistry::new();
        registry.register(plain("Same", "1"));
        registry.register(plain("Same", "2"));
        assert!(matches!(
            registry.discover(),
            Err(LintError::DuplicateRuleType(_))
        ));
    }

    #[test]
    fn test_describe_is_sorted() {
        let mut registry = RuleRegistry::new();
        registry.register(plain("Second", "2"));
        registry.register(plain("First", "1"));

        let lines = registry.describe();
        assert_eq!(lines[0], "1 - First - MAY - Test rule - https://example.com/#1");
        assert!(lines[1].starts_with("2 - Second"));
    }
}

//! Array names should be pluralized (rule 120).
//!
//! Flags array-typed component schemas and array-typed schema properties
//! whose name looks singular. Names listed in the `whitelist` setting are
//! exempt.

use std::collections::BTreeSet;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use crate::document::{Context, pointer};
use crate::rule::{Check, Rule, RuleConfig, RuleDescriptor, RuleType, Severity, Violation};

use super::ZALANDO;

pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: "120",
    severity: Severity::Should,
    title: "Array names should be pluralized",
    rule_set: &ZALANDO,
};

/// Words whose singular and plural forms coincide, or that are only used in plural
const UNCOUNTABLE: &[&str] = &[
    "data", "metadata", "info", "information", "media", "news", "series", "species",
    "equipment", "feedback", "content", "software", "hardware", "evidence", "staff",
];

const IRREGULAR_PLURALS: &[&str] = &[
    "children", "people", "men", "women", "feet", "teeth", "mice", "geese", "criteria",
    "phenomena", "indices", "matrices", "vertices", "analyses", "crises", "theses",
];

const IRREGULAR_SINGULARS: &[&str] = &[
    "child", "person", "man", "woman", "foot", "tooth", "mouse", "goose", "criterion",
    "phenomenon", "index", "matrix", "vertex", "analysis", "crisis", "thesis",
];

pub struct PluralizeNamesForArraysRule {
    whitelist: BTreeSet<String>,
    last_word: Regex,
}

impl PluralizeNamesForArraysRule {
    pub fn new(config: &RuleConfig) -> Result<Self> {
        Ok(Self {
            whitelist: config.string_list("whitelist")?.into_iter().collect(),
            last_word: Regex::new(r"[A-Z]?[a-z0-9]+$")?,
        })
    }

    pub fn rule_type() -> RuleType {
        RuleType::new("PluralizeNamesForArraysRule", DESCRIPTOR)
            .with_config_constructor(|config| Ok(Box::new(Self::new(config)?)))
    }

    /// Heuristic plural test on the last word of a camelCase or snake_case name
    pub fn is_plural(&self, name: &str) -> bool {
        let tail = name
            .rsplit(['_', '-', ' ', '.'])
            .find(|part| !part.is_empty())
            .unwrap_or(name);
        let word = self
            .last_word
            .find(tail)
            .map(|m| m.as_str())
            .unwrap_or(tail)
            .to_lowercase();

        if word.is_empty() {
            return true;
        }
        if UNCOUNTABLE.contains(&word.as_str()) || IRREGULAR_PLURALS.contains(&word.as_str()) {
            return true;
        }
        if IRREGULAR_SINGULARS.contains(&word.as_str()) {
            return false;
        }
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return false;
        }
        word.ends_with('s')
    }

    fn check_array_names(&self, context: &Context) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        let root = context.root();

        for base in ["/components/schemas", "/definitions"] {
            let Some(Value::Object(schemas)) = root.pointer(base) else {
                continue;
            };
            for (name, schema) in schemas {
                let at = pointer::append(base, name);
                if is_array(schema) {
                    self.inspect(name, &at, &mut violations);
                }
                self.walk_properties(schema, &at, &mut violations);
            }
        }

        Ok(violations)
    }

    fn walk_properties(&self, schema: &Value, at: &str, violations: &mut Vec<Violation>) {
        if let Some(Value::Object(properties)) = schema.get("properties") {
            let base = pointer::append(at, "properties");
            for (name, property) in properties {
                let property_at = pointer::append(&base, name);
                if is_array(property) {
                    self.inspect(name, &property_at, violations);
                }
                self.walk_properties(property, &property_at, violations);
            }
        }
        if let Some(items) = schema.get("items") {
            self.walk_properties(items, &pointer::append(at, "items"), violations);
        }
    }

    fn inspect(&self, name: &str, at: &str, violations: &mut Vec<Violation>) {
        if self.whitelist.contains(name) || self.is_plural(name) {
            return;
        }
        violations.push(Violation::new(
            format!("Array property name appears to be singular: {}", name),
            at,
        ));
    }
}

impl Rule for PluralizeNamesForArraysRule {
    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("check_array_names", Severity::Should, |ctx| {
            self.check_array_names(ctx)
        })]
    }
}

fn is_array(schema: &Value) -> bool {
    match schema.get("type") {
        Some(Value::String(kind)) => kind == "array",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k == "array"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(config: Value) -> PluralizeNamesForArraysRule {
        let config = RuleConfig::new(config.as_object().cloned().unwrap());
        PluralizeNamesForArraysRule::new(&config).unwrap()
    }

    fn run(rule: &PluralizeNamesForArraysRule, document: Value) -> Vec<Violation> {
        rule.check_array_names(&Context::new(document)).unwrap()
    }

    #[test]
    fn test_plural_heuristic() {
        let rule = rule(json!({}));
        for plural in ["pets", "petTags", "order_items", "data", "children", "Addresses"] {
            assert!(rule.is_plural(plural), "{} should be plural", plural);
        }
        for singular in ["pet", "address", "status", "child", "petTag", "analysis"] {
            assert!(!rule.is_plural(singular), "{} should be singular", singular);
        }
    }

    #[test]
    fn test_singular_array_property() {
        let violations = run(
            &rule(json!({})),
            json!({
                "components": {"schemas": {"Pet": {
                    "type": "object",
                    "properties": {
                        "tag": {"type": "array", "items": {"type": "string"}},
                        "names": {"type": "array", "items": {"type": "string"}},
                        "owner": {"type": "string"}
                    }
                }}}
            }),
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].pointer, "/components/schemas/Pet/properties/tag");
        assert_eq!(
            violations[0].description,
            "Array property name appears to be singular: tag"
        );
    }

    #[test]
    fn test_array_schema_and_nested_items() {
        let violations = run(
            &rule(json!({})),
            json!({
                "definitions": {"PetList": {
                    "type": "array",
                    "items": {"properties": {"photo": {"type": "array"}}}
                }}
            }),
        );
        let pointers: Vec<_> = violations.iter().map(|v| v.pointer.as_str()).collect();
        assert_eq!(
            pointers,
            vec!["/definitions/PetList", "/definitions/PetList/items/properties/photo"]
        );
    }

    #[test]
    fn test_whitelist_exempts_names() {
        let document = json!({
            "components": {"schemas": {"Pet": {
                "properties": {"tag": {"type": "array"}}
            }}}
        });
        assert_eq!(run(&rule(json!({})), document.clone()).len(), 1);
        assert!(run(&rule(json!({"whitelist": ["tag"]})), document).is_empty());
    }

    #[test]
    fn test_malformed_whitelist_fails_construction() {
        let config = RuleConfig::new(json!({"whitelist": "tag"}).as_object().cloned().unwrap());
        assert!(PluralizeNamesForArraysRule::new(&config).is_err());
    }

    #[test]
    fn test_document_without_schemas() {
        assert!(run(&rule(json!({})), json!({"openapi": "3.0.0"})).is_empty());
    }
}

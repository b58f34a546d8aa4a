//! Validation Context
//!
//! Read-only view of the parsed document shared by every check of a run,
//! plus the ignore markers the document carries about itself.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use super::pointer;

/// Extension key listing rule ids to ignore at (and below) a node
pub const IGNORE_EXTENSION: &str = "x-zally-ignore";

/// Rule id matching every rule in an ignore marker
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone)]
pub struct Context {
    root: Value,
    ignores: BTreeMap<String, BTreeSet<String>>,
}

impl Context {
    pub fn new(root: Value) -> Self {
        let mut ignores = BTreeMap::new();
        collect_ignores(&root, "", &mut ignores);
        Self { root, ignores }
    }

    /// Parsed document root
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve a pointer inside the document
    pub fn resolve(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(pointer::normalize(pointer))
    }

    /// Ignore markers keyed by the pointer of the node carrying them
    pub fn ignore_markers(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.ignores
    }

    /// True when the node at `pointer`, or any ancestor, lists `rule_id`
    pub fn is_ignored(&self, pointer: &str, rule_id: &str) -> bool {
        if self.ignores.is_empty() {
            return false;
        }
        pointer::self_and_ancestors(pointer)
            .into_iter()
            .filter_map(|p| self.ignores.get(p))
            .any(|ids| ids.contains(rule_id))
    }
}

fn collect_ignores(node: &Value, at: &str, ignores: &mut BTreeMap<String, BTreeSet<String>>) {
    match node {
        Value::Object(map) => {
            if let Some(marker) = map.get(IGNORE_EXTENSION) {
                let ids = marker_ids(marker);
                if !ids.is_empty() {
                    ignores.entry(at.to_string()).or_default().extend(ids);
                }
            }
            for (key, child) in map {
                if key != IGNORE_EXTENSION {
                    collect_ignores(child, &pointer::append(at, key), ignores);
                }
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                collect_ignores(child, &pointer::append_index(at, idx), ignores);
            }
        }
        _ => {}
    }
}

fn marker_ids(marker: &Value) -> Vec<String> {
    let single = |v: &Value| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    match marker {
        Value::Array(items) => items.iter().filter_map(single).collect(),
        other => single(other).into_iter().collect(),
    }
}

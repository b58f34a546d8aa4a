//! Per-rule configuration handed to configurable rule constructors.

use anyhow::{Context as _, Result, bail};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Settings for one rule: its own section layered over the global defaults.
///
/// Always present, possibly empty, so constructors never deal with a
/// missing configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleConfig {
    values: Map<String, Value>,
}

impl RuleConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Shallow merge: keys of `section` win over keys of `defaults`
    pub fn merged(defaults: &Map<String, Value>, section: Option<&Map<String, Value>>) -> Self {
        let mut values = defaults.clone();
        if let Some(section) = section {
            for (key, value) in section {
                values.insert(key.clone(), value.clone());
            }
        }
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Read a list of strings; a missing key yields an empty list
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    other => bail!("'{}' must contain only strings, found {}", key, other),
                })
                .collect(),
            Some(other) => bail!("'{}' must be a list of strings, found {}", key, other),
        }
    }

    /// Deserialize the whole section into a typed settings struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.values.clone()))
            .context("Rule configuration does not match the expected shape")
    }
}

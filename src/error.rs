//! Engine Errors
//!
//! Fatal failures of a validation run. Rule violations are never errors;
//! they are the regular output of a run.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause raised by rule plugin code
pub type PluginError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("rule id '{id}' is declared by both {first} and {second}")]
    DuplicateRuleId {
        id: String,
        first: String,
        second: String,
    },

    #[error("rule type '{0}' is registered more than once")]
    DuplicateRuleType(String),

    #[error("rule type '{0}' cannot be resolved to a constructible rule")]
    UnresolvableRule(String),

    #[error("configuration for rule '{rule}' must be a table, found {found}")]
    MalformedRuleConfig { rule: String, found: &'static str },

    #[error("cannot instantiate rule {rule}")]
    Instantiation {
        rule: String,
        #[source]
        source: PluginError,
    },

    #[error("check '{check}' of rule {rule_id} ({rule}) failed")]
    CheckFailed {
        rule_id: String,
        rule: String,
        check: String,
        #[source]
        source: PluginError,
    },

    #[error("cannot read document {}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document is neither valid YAML nor JSON")]
    DocumentParse(#[from] serde_yaml::Error),
}

impl LintError {
    /// True for failures raised before any check ran
    pub fn is_startup_error(&self) -> bool {
        matches!(
            self,
            LintError::DuplicateRuleId { .. }
                | LintError::DuplicateRuleType(_)
                | LintError::UnresolvableRule(_)
                | LintError::MalformedRuleConfig { .. }
                | LintError::Instantiation { .. }
        )
    }
}

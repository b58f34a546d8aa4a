//! OpenAPI Lint
//!
//! A rule engine validating OpenAPI descriptions against API guidelines.
//!
//! This library provides:
//! - The rule plugin contract and an explicit rule registry
//! - Check invocation, ignore markers and skip-lists
//! - Canonically ordered results with source locations
//! - The bundled Zalando guideline rules
//! - Configuration management

pub mod config;
pub mod document;
pub mod error;
pub mod rule;
pub mod rules;
pub mod validation;

// Re-exports for clean public API
pub use config::{Config, LintConfig};
pub use document::{Context, Document, Location};
pub use error::LintError;
pub use rule::{Check, Rule, RuleConfig, RuleRegistry, RuleType, Severity, Violation};
pub use validation::{LintResult, Linter, Report};

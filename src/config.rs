//! Configuration management for the OpenAPI linter.
//!
//! Handles:
//! - Command-line argument parsing
//! - The TOML engine configuration (skip-list, fail-on, rule sections)
//! - Per-rule configuration blobs given on the command line

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::rule::Severity;

/// Command-line arguments for the OpenAPI linter
#[derive(Debug, Parser)]
#[command(name = "openapi-lint")]
#[command(about = "Validate OpenAPI descriptions against API guideline rules")]
#[command(version)]
pub struct Args {
    /// OpenAPI document to validate (YAML or JSON)
    #[arg(required_unless_present = "list_rules")]
    pub source: Option<PathBuf>,

    /// Engine configuration file
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Per-rule configuration, overriding the configuration file
    #[arg(
        long = "rule-config",
        value_name = "NAME=BLOB",
        help = "Rule configuration as a YAML or JSON blob, e.g. PluralizeNamesForArraysRule='{whitelist: [data]}'"
    )]
    pub rule_config: Vec<String>,

    /// Rules to leave out of the run
    #[arg(long = "skip-rule", value_name = "NAME", help = "Rule type name or id to skip")]
    pub skip_rule: Vec<String>,

    /// Severities that fail the run
    #[arg(long = "fail-on", value_name = "SEVERITY", help = "Fail on results of this severity")]
    pub fail_on: Vec<Severity>,

    /// Evaluate rules on a worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Print results as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Print the available rules and exit
    #[arg(long)]
    pub list_rules: bool,

    /// Skip the whole run
    #[arg(long)]
    pub skip: bool,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Engine configuration, as read from TOML
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Rule type names (or ids) excluded from the run
    pub skip_rules: BTreeSet<String>,
    /// Severities that fail the run when any result carries them
    pub fail_on: Vec<Severity>,
    pub parallel: bool,
    /// Settings merged under every rule's own section
    pub defaults: Map<String, Value>,
    /// Per-rule sections keyed by rule type name
    pub rules: BTreeMap<String, Value>,
}

impl LintConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid linter configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Layer a YAML or JSON blob over the rule's section, key by key
    pub fn set_rule_config(&mut self, rule: &str, blob: &str) -> Result<()> {
        let parsed: Value = serde_yaml::from_str(blob)
            .with_context(|| format!("Invalid configuration blob for rule {}", rule))?;
        let overrides = match parsed {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => bail!(
                "Configuration for rule {} must be a mapping, found {}",
                rule,
                other
            ),
        };

        let section = self
            .rules
            .entry(rule.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match section {
            Value::Object(existing) => existing.extend(overrides),
            other => *other = Value::Object(overrides),
        }
        Ok(())
    }

    /// Apply a `NAME=BLOB` assignment
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let Some((rule, blob)) = assignment.split_once('=') else {
            bail!("Expected NAME=BLOB, got '{}'", assignment);
        };
        let rule = rule.trim();
        if rule.is_empty() {
            bail!("Missing rule name in '{}'", assignment);
        }
        self.set_rule_config(rule, blob)
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub source: Option<PathBuf>,
    pub lint: LintConfig,
    pub json: bool,
    pub list_rules: bool,
    pub skip: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let mut lint = match &args.config {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file does not exist: {}", path.display());
                }
                LintConfig::load(path)?
            }
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => LintConfig::load(&path)?,
                None => LintConfig::default(),
            },
        };

        lint.skip_rules.extend(args.skip_rule);
        if !args.fail_on.is_empty() {
            lint.fail_on = args.fail_on;
        }
        lint.parallel |= args.parallel;
        for assignment in &args.rule_config {
            lint.apply_assignment(assignment)?;
        }

        Ok(Config {
            source: args.source,
            lint,
            json: args.json,
            list_rules: args.list_rules,
            skip: args.skip,
            log_level: args.log_level,
        })
    }
}

/// `<config_dir>/openapi-lint/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("openapi-lint").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_toml() {
        let config = LintConfig::from_toml_str(
            r#"
skip_rules = ["NoVersionInUriRule"]
fail_on = ["MUST", "should"]
parallel = true

[defaults]
limit = 3

[rules.PluralizeNamesForArraysRule]
whitelist = ["data"]
"#,
        )
        .unwrap();

        assert!(config.skip_rules.contains("NoVersionInUriRule"));
        assert_eq!(config.fail_on, vec![Severity::Must, Severity::Should]);
        assert!(config.parallel);
        assert_eq!(config.defaults.get("limit"), Some(&json!(3)));
        assert_eq!(
            config.rules["PluralizeNamesForArraysRule"],
            json!({"whitelist": ["data"]})
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(LintConfig::from_toml_str("skip = true").is_err());
    }

    #[test]
    fn test_rule_blob_overrides_section() {
        let mut config = LintConfig::from_toml_str(
            r#"
[rules.PluralizeNamesForArraysRule]
whitelist = ["data"]
limit = 1
"#,
        )
        .unwrap();

        config
            .apply_assignment("PluralizeNamesForArraysRule={whitelist: [items, info]}")
            .unwrap();
        assert_eq!(
            config.rules["PluralizeNamesForArraysRule"],
            json!({"whitelist": ["items", "info"], "limit": 1})
        );

        config.apply_assignment(r#"Other={"enabled": true}"#).unwrap();
        assert_eq!(config.rules["Other"], json!({"enabled": true}));
    }

    #[test]
    fn test_malformed_assignments() {
        let mut config = LintConfig::default();
        assert!(config.apply_assignment("no-separator").is_err());
        assert!(config.apply_assignment("=whatever").is_err());
        assert!(config.apply_assignment("Rule=[1, 2]").is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let args = Args::try_parse_from([
            "openapi-lint",
            "api.yaml",
            "--skip-rule",
            "115",
            "--fail-on",
            "must",
            "--parallel",
            "--rule-config",
            "PluralizeNamesForArraysRule={whitelist: [data]}",
        ])
        .unwrap();
        assert_eq!(args.fail_on, vec![Severity::Must]);

        let mut lint = LintConfig::default();
        lint.skip_rules.extend(args.skip_rule);
        assert!(lint.skip_rules.contains("115"));
        assert!(args.parallel);
    }

    #[test]
    fn test_source_required_unless_listing() {
        assert!(Args::try_parse_from(["openapi-lint"]).is_err());
        assert!(Args::try_parse_from(["openapi-lint", "--list-rules"]).is_ok());
    }

    #[test]
    fn test_missing_config_file_is_fatal() {
        let args = Args::try_parse_from([
            "openapi-lint",
            "api.yaml",
            "--config",
            "/nonexistent/openapi-lint.toml",
        ])
        .unwrap();
        assert!(Config::from_args(args).is_err());
    }
}

//! Do not use URI versioning (rule 115).

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use crate::document::{Context, pointer};
use crate::rule::{Check, Rule, RuleDescriptor, RuleType, Severity, Violation};

use super::ZALANDO;

pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: "115",
    severity: Severity::Must,
    title: "Do not use URI versioning",
    rule_set: &ZALANDO,
};

pub struct NoVersionInUriRule {
    version_segment: Regex,
}

impl NoVersionInUriRule {
    pub fn new() -> Result<Self> {
        Ok(Self {
            version_segment: Regex::new(r"(?i)/v[0-9]+(?:\.[0-9]+)*(?:/|$)")?,
        })
    }

    pub fn rule_type() -> RuleType {
        RuleType::new("NoVersionInUriRule", DESCRIPTOR)
            .with_plain_constructor(|| Ok(Box::new(Self::new()?)))
    }

    fn check_server_urls(&self, context: &Context) -> Result<Vec<Violation>> {
        let Some(Value::Array(servers)) = context.root().get("servers") else {
            return Ok(Vec::new());
        };

        Ok(servers
            .iter()
            .enumerate()
            .filter_map(|(index, server)| {
                let url = server.get("url")?.as_str()?;
                self.version_segment.is_match(url).then(|| {
                    let at = pointer::append(&pointer::append_index("/servers", index), "url");
                    Violation::new(format!("URL contains version number: {}", url), at)
                })
            })
            .collect())
    }

    fn check_paths(&self, context: &Context) -> Result<Vec<Violation>> {
        let Some(Value::Object(paths)) = context.root().get("paths") else {
            return Ok(Vec::new());
        };

        Ok(paths
            .keys()
            .filter(|path| self.version_segment.is_match(path))
            .map(|path| {
                Violation::new(
                    format!("Path contains version number: {}", path),
                    pointer::append("/paths", path),
                )
            })
            .collect())
    }
}

impl Rule for NoVersionInUriRule {
    fn checks(&self) -> Vec<Check<'_>> {
        vec![
            Check::new("check_server_urls", Severity::Must, |ctx| {
                self.check_server_urls(ctx)
            }),
            Check::new("check_paths", Severity::Must, |ctx| self.check_paths(ctx)),
        ]
    }
}

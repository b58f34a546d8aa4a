//! Bundled Rules
//!
//! The rules shipped with the linter, all members of the Zalando RESTful API
//! guideline rule set.

pub mod pluralize_arrays;
pub mod uri_versioning;

use crate::rule::{RuleRegistry, RuleSet};

pub use pluralize_arrays::PluralizeNamesForArraysRule;
pub use uri_versioning::NoVersionInUriRule;

/// Zalando RESTful API guidelines
pub static ZALANDO: RuleSet = RuleSet::new(
    "zalando",
    "1.0",
    "https://opensource.zalando.com/restful-api-guidelines/#{id}",
);

/// Register every bundled rule, in discovery order
pub fn register_builtin_rules(registry: &mut RuleRegistry) {
    registry.register(PluralizeNamesForArraysRule::rule_type());
    registry.register(NoVersionInUriRule::rule_type());
}

//! Validation Engine
//!
//! Check invocation, violation collection and aggregation of results.

pub mod collector;
pub mod engine;
pub mod invoker;
pub mod report;
pub mod skip;

pub use collector::ViolationCollector;
pub use engine::Linter;
pub use invoker::{CheckOutput, invoke_checks};
pub use report::{LintResult, Report, SeverityAggregator, SeverityGroups, canonical_order};
pub use skip::SkipFilter;

//! Rule Plugin System
//!
//! The contract rule plugins implement, plus discovery and instantiation.

pub mod check;
pub mod config;
pub mod instantiate;
pub mod registry;
pub mod schema;

pub use check::{Check, CheckDescriptor, CheckFn, Rule};
pub use config::RuleConfig;
pub use instantiate::{RuleInstance, RuleInstantiator};
pub use registry::{ConfiguredConstructor, PlainConstructor, RuleRegistry, RuleType};
pub use schema::{RuleDescriptor, RuleSet, Severity, Violation};

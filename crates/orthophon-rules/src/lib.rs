//! Phonological rewrite rules.
//!
//! Rules pair a condition (what to rewrite) with an action (how) and an
//! optional environment (where). This crate builds and validates rules and
//! applies ordered rule lists to segment sequences.
//!
//! # Architecture
//!
//! - [`environment`] -- Left/right context predicates with boundary markers
//! - [`rule`] -- Rule construction, validation and per-position application
//! - [`sweep`] -- Single-sweep application of one rule and of ordered lists

pub mod environment;
pub mod rule;
pub mod sweep;

pub use environment::{ANY, EnvMatcher, Environment, S, W, environment};
pub use rule::{Action, Rewrite, Rule, rule, with_environment};
pub use sweep::{apply_rule, apply_rules};

/// Error type for rule construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The action cannot apply to what the condition selects.
    #[error("malformed rule {rule}: {reason}")]
    MalformedRule { rule: String, reason: String },
}

//! Core rule trait and per-field evaluation context
//!
//! Rules are registered once into the [`RuleRegistry`](crate::registry::RuleRegistry)
//! and shared across validation passes. The trait is async so a rule can
//! reach out to a store (uniqueness checks and the like) without blocking
//! unrelated passes.

pub mod builtin;

use crate::error::EngineError;
use crate::value::get_path;
use async_trait::async_trait;
use serde_json::Value;

/// Outcome of checking one rule against one field.
///
/// Field failures travel in `Ok(Fail)`; the `Err` channel is reserved for
/// engine faults (bad arguments, broken patterns) that abort the whole pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleVerdict {
    Pass,
    /// Failure with the message to record against the field.
    Fail(String),
}

impl RuleVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, RuleVerdict::Pass)
    }
}

/// Everything a rule sees for one field check.
pub struct FieldContext<'a> {
    /// The full (sanitized) data object.
    pub data: &'a Value,
    /// Dotted path of the field under check.
    pub field: &'a str,
    /// Resolved message: the schema's custom override or the rule default.
    pub message: &'a str,
    /// Raw string arguments from the rule spec.
    pub args: &'a [String],
}

impl<'a> FieldContext<'a> {
    /// Field value; `None` when the path is absent from the data object,
    /// which is distinct from a present `null`.
    pub fn value(&self) -> Option<&'a Value> {
        get_path(self.data, self.field)
    }

    /// Resolve another field by dotted path (for `same:`-style rules).
    pub fn lookup(&self, path: &str) -> Option<&'a Value> {
        get_path(self.data, path)
    }

    /// Positional argument as a raw string.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Failure verdict carrying this check's resolved message.
    pub fn fail(&self) -> RuleVerdict {
        RuleVerdict::Fail(self.message.to_string())
    }

    /// Engine fault for arguments the rule cannot work with.
    pub fn bad_args(&self, detail: impl Into<String>) -> EngineError {
        EngineError::MalformedRuleSpec {
            field: self.field.to_string(),
            detail: detail.into(),
        }
    }
}

/// A named validation rule.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Check the field. `Ok(Fail)` records a message; `Err` aborts the pass.
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError>;

    /// Rule name as referenced from rule specs.
    fn name(&self) -> &str;

    /// Message used when the schema carries no custom override.
    fn default_message(&self, field: &str, args: &[String]) -> String;
}

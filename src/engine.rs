//! Validation engine - schema evaluation in two modes
//!
//! Fields are walked in schema declaration order, each field's rules in spec
//! order, so the outcome always reports failures in rule-spec order.
//! Evaluation state is local to the pass; the only shared structure is the
//! read-mostly registry, so concurrent passes never interfere.

use crate::error::{EngineError, RuleKind};
use crate::outcome::ValidationOutcome;
use crate::registry::RuleRegistry;
use crate::rules::{FieldContext, Rule, RuleVerdict};
use crate::sanitize::{self, Sanitizer};
use crate::schema::{message_for, MessageMap, Schema};
use crate::format::Formatter;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Evaluation mode for one validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Abort the whole pass on the first failure anywhere.
    StopOnFirstError,
    /// Walk every field, recording the first failure per field.
    CollectAll,
}

/// The validation engine. Cheap to clone; clones share one registry.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<RuleRegistry>,
}

impl Engine {
    /// Engine over a fresh registry pre-loaded with the built-ins.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RuleRegistry::new()),
        }
    }

    /// Engine over an existing (typically shared) registry.
    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    /// Read access to the backing registry.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Stop-on-first-error validation: at most one error entry.
    pub async fn validate(
        &self,
        data: &Value,
        schema: &Schema,
        messages: &MessageMap,
    ) -> Result<ValidationOutcome, EngineError> {
        self.validate_with_mode(data, schema, messages, Mode::StopOnFirstError)
            .await
    }

    /// Collect-all validation: every failing field reports its first failure.
    pub async fn validate_all(
        &self,
        data: &Value,
        schema: &Schema,
        messages: &MessageMap,
    ) -> Result<ValidationOutcome, EngineError> {
        self.validate_with_mode(data, schema, messages, Mode::CollectAll)
            .await
    }

    /// Validation with an explicit [`Mode`], for callers that pick the mode
    /// at runtime.
    pub async fn validate_with_mode(
        &self,
        data: &Value,
        schema: &Schema,
        messages: &MessageMap,
        mode: Mode,
    ) -> Result<ValidationOutcome, EngineError> {
        self.run(data, schema, messages, mode).await
    }

    /// Apply a sanitization schema, returning a new data object.
    pub fn sanitize(&self, data: &Value, schema: &Schema) -> Result<Value, EngineError> {
        sanitize::run(&self.registry, data, schema)
    }

    /// Register a custom rule; available to subsequent passes immediately.
    pub fn extend(&self, name: &str, rule: Arc<dyn Rule>) {
        self.registry.register_rule(name, rule);
    }

    /// Register a custom sanitizer.
    pub fn extend_sanitizer(&self, name: &str, sanitizer: Arc<dyn Sanitizer>) {
        self.registry.register_sanitizer(name, sanitizer);
    }

    /// Register a custom formatter.
    pub fn extend_formatter(&self, name: &str, formatter: Arc<dyn Formatter>) {
        self.registry.register_formatter(name, formatter);
    }

    async fn run(
        &self,
        data: &Value,
        schema: &Schema,
        messages: &MessageMap,
        mode: Mode,
    ) -> Result<ValidationOutcome, EngineError> {
        let mut outcome = ValidationOutcome::default();

        'fields: for (field, descriptors) in schema.fields() {
            for descriptor in descriptors {
                let rule =
                    self.registry
                        .rule(&descriptor.name)
                        .ok_or_else(|| EngineError::UnknownRule {
                            kind: RuleKind::Validation,
                            name: descriptor.name.clone(),
                        })?;

                let message = match message_for(messages, field, &descriptor.name) {
                    Some(custom) => custom.to_string(),
                    None => rule.default_message(field, &descriptor.args),
                };

                let ctx = FieldContext {
                    data,
                    field,
                    message: &message,
                    args: &descriptor.args,
                };

                match rule.check(&ctx).await? {
                    RuleVerdict::Pass => {}
                    RuleVerdict::Fail(text) => {
                        debug!("Rule '{}' failed for field '{}'", descriptor.name, field);
                        outcome.record(field, text);
                        match mode {
                            Mode::StopOnFirstError => break 'fields,
                            // remaining rules for an already-failed field are
                            // skipped: one message per field
                            Mode::CollectAll => continue 'fields,
                        }
                    }
                }
            }
        }

        Ok(outcome)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

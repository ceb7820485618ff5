//! Presence rules - the only built-ins that fail on absent input

use super::as_text;
use crate::error::EngineError;
use crate::rules::{FieldContext, Rule, RuleVerdict};
use async_trait::async_trait;
use serde_json::Value;

/// `required` - the field must be present and non-empty.
///
/// Empty means: absent, null, whitespace-only string, empty array or object.
pub struct RequiredRule;

#[async_trait]
impl Rule for RequiredRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let empty = match ctx.value() {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(Value::Object(map)) => map.is_empty(),
            Some(_) => false,
        };
        Ok(if empty { ctx.fail() } else { RuleVerdict::Pass })
    }

    fn name(&self) -> &str {
        "required"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} is required", field)
    }
}

/// `accepted` - consent checkboxes and the like; must be present and truthy.
pub struct AcceptedRule;

#[async_trait]
impl Rule for AcceptedRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let accepted = ctx
            .value()
            .and_then(as_text)
            .map(|text| matches!(text.to_lowercase().as_str(), "yes" | "on" | "1" | "true"))
            .unwrap_or(false);
        Ok(if accepted { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "accepted"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} must be accepted", field)
    }
}

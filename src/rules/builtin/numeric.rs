//! Numeric and type-shape rules

use super::skippable;
use crate::error::EngineError;
use crate::rules::{FieldContext, Rule, RuleVerdict};
use async_trait::async_trait;
use serde_json::Value;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// `integer` - whole number, or a string holding one.
pub struct IntegerRule;

#[async_trait]
impl Rule for IntegerRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = match value {
            Some(Value::Number(number)) => number.is_i64() || number.is_u64(),
            Some(Value::String(text)) => text.trim().parse::<i64>().is_ok(),
            _ => false,
        };
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "integer"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} must be an integer", field)
    }
}

/// `float` - any number, or a string holding one.
pub struct FloatRule;

#[async_trait]
impl Rule for FloatRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = value.and_then(as_f64).is_some();
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "float"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} must be a number", field)
    }
}

/// `boolean` - a bool, or one of the usual stringly forms.
pub struct BooleanRule;

#[async_trait]
impl Rule for BooleanRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = match value {
            Some(Value::Bool(_)) => true,
            Some(Value::String(text)) => {
                matches!(text.to_lowercase().as_str(), "true" | "false" | "0" | "1")
            }
            Some(Value::Number(number)) => {
                matches!(number.as_i64(), Some(0) | Some(1))
            }
            _ => false,
        };
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "boolean"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} must be a boolean", field)
    }
}

/// `range:<min>,<max>` - numeric value within the inclusive range.
pub struct RangeRule;

#[async_trait]
impl Rule for RangeRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let min: f64 = ctx
            .arg(0)
            .and_then(|arg| arg.parse().ok())
            .ok_or_else(|| ctx.bad_args("range expects numeric min and max arguments"))?;
        let max: f64 = ctx
            .arg(1)
            .and_then(|arg| arg.parse().ok())
            .ok_or_else(|| ctx.bad_args("range expects numeric min and max arguments"))?;

        let valid = value
            .and_then(as_f64)
            .map(|number| number >= min && number <= max)
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "range"
    }

    fn default_message(&self, field: &str, args: &[String]) -> String {
        let min = args.first().map(String::as_str).unwrap_or("?");
        let max = args.get(1).map(String::as_str).unwrap_or("?");
        format!("{} must be between {} and {}", field, min, max)
    }
}

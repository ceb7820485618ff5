//! Comparison rules - against spec arguments or other fields

use super::{as_text, skippable};
use crate::error::EngineError;
use crate::rules::{FieldContext, Rule, RuleVerdict};
use async_trait::async_trait;

/// `in:<a>,<b>,...` - value must be one of the listed options.
pub struct InRule;

#[async_trait]
impl Rule for InRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        if ctx.args.is_empty() {
            return Err(ctx.bad_args("in expects at least one option"));
        }
        let valid = value
            .and_then(as_text)
            .map(|text| ctx.args.iter().any(|option| option == &text))
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "in"
    }

    fn default_message(&self, field: &str, args: &[String]) -> String {
        format!("{} must be one of: {}", field, args.join(", "))
    }
}

/// `not_in:<a>,<b>,...` - value must not be one of the listed options.
pub struct NotInRule;

#[async_trait]
impl Rule for NotInRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        if ctx.args.is_empty() {
            return Err(ctx.bad_args("not_in expects at least one option"));
        }
        let blocked = value
            .and_then(as_text)
            .map(|text| ctx.args.iter().any(|option| option == &text))
            .unwrap_or(false);
        Ok(if blocked { ctx.fail() } else { RuleVerdict::Pass })
    }

    fn name(&self) -> &str {
        "not_in"
    }

    fn default_message(&self, field: &str, args: &[String]) -> String {
        format!("{} may not be one of: {}", field, args.join(", "))
    }
}

/// `same:<other>` - value must equal another field (password confirmation).
pub struct SameRule;

#[async_trait]
impl Rule for SameRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let other = ctx
            .arg(0)
            .ok_or_else(|| ctx.bad_args("same expects a field argument"))?;
        let valid = value == ctx.lookup(other);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "same"
    }

    fn default_message(&self, field: &str, args: &[String]) -> String {
        let other = args.first().map(String::as_str).unwrap_or("?");
        format!("{} must match {}", field, other)
    }
}

/// `different:<other>` - value must differ from another field.
pub struct DifferentRule;

#[async_trait]
impl Rule for DifferentRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let other = ctx
            .arg(0)
            .ok_or_else(|| ctx.bad_args("different expects a field argument"))?;
        let valid = value != ctx.lookup(other);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "different"
    }

    fn default_message(&self, field: &str, args: &[String]) -> String {
        let other = args.first().map(String::as_str).unwrap_or("?");
        format!("{} must differ from {}", field, other)
    }
}

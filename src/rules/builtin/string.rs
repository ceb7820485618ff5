//! String-shape rules

use super::{as_text, skippable};
use crate::error::EngineError;
use crate::rules::{FieldContext, Rule, RuleVerdict};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

/// `email` - practical mailbox shape check, not full RFC 5322.
pub struct EmailRule;

fn looks_like_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !text.contains(char::is_whitespace)
        && !domain.contains('@')
}

#[async_trait]
impl Rule for EmailRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = value
            .and_then(|v| v.as_str())
            .map(looks_like_email)
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "email"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} is not a valid email", field)
    }
}

/// `url` - http/https URL with a dotted host.
pub struct UrlRule;

fn looks_like_url(url: &str) -> bool {
    let rest = if let Some(rest) = url.strip_prefix("https://") {
        rest
    } else if let Some(rest) = url.strip_prefix("http://") {
        rest
    } else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty() && host.contains('.') && !host.contains(char::is_whitespace)
}

#[async_trait]
impl Rule for UrlRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = value
            .and_then(|v| v.as_str())
            .map(looks_like_url)
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "url"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} is not a valid URL", field)
    }
}

/// `alpha_numeric` - letters and digits only.
pub struct AlphaNumericRule;

#[async_trait]
impl Rule for AlphaNumericRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = value
            .and_then(as_text)
            .map(|text| !text.is_empty() && text.chars().all(char::is_alphanumeric))
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "alpha_numeric"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} may only contain letters and numbers", field)
    }
}

/// `min:<n>` - minimum string/array length, or minimum numeric value.
pub struct MinRule;

/// `max:<n>` - maximum string/array length, or maximum numeric value.
pub struct MaxRule;

fn size_of(value: &Value) -> Option<f64> {
    match value {
        Value::String(text) => Some(text.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Number(number) => number.as_f64(),
        _ => None,
    }
}

fn numeric_arg(ctx: &FieldContext<'_>, rule: &str) -> Result<f64, EngineError> {
    ctx.arg(0)
        .and_then(|arg| arg.parse().ok())
        .ok_or_else(|| ctx.bad_args(format!("{} expects a numeric argument", rule)))
}

#[async_trait]
impl Rule for MinRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let min = numeric_arg(ctx, "min")?;
        let valid = value.and_then(size_of).map(|size| size >= min).unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "min"
    }

    fn default_message(&self, field: &str, args: &[String]) -> String {
        let limit = args.first().map(String::as_str).unwrap_or("?");
        format!("{} must be at least {} characters", field, limit)
    }
}

#[async_trait]
impl Rule for MaxRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let max = numeric_arg(ctx, "max")?;
        let valid = value.and_then(size_of).map(|size| size <= max).unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "max"
    }

    fn default_message(&self, field: &str, args: &[String]) -> String {
        let limit = args.first().map(String::as_str).unwrap_or("?");
        format!("{} must be at most {} characters", field, limit)
    }
}

/// `regex:<pattern>` - value must match the given pattern.
///
/// The parser splits arguments on commas, so patterns containing commas are
/// re-joined here. An uncompilable pattern is a spec error, not a field
/// failure.
pub struct RegexRule;

#[async_trait]
impl Rule for RegexRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        if ctx.args.is_empty() {
            return Err(ctx.bad_args("regex expects a pattern argument"));
        }
        let pattern = ctx.args.join(",");
        let compiled = Regex::new(&pattern)
            .map_err(|err| ctx.bad_args(format!("invalid regex pattern: {}", err)))?;
        let valid = value
            .and_then(as_text)
            .map(|text| compiled.is_match(&text))
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "regex"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} has an invalid format", field)
    }
}

/// `ip` - IPv4 or IPv6 address.
pub struct IpRule;

#[async_trait]
impl Rule for IpRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = value
            .and_then(|v| v.as_str())
            .map(|text| text.parse::<std::net::IpAddr>().is_ok())
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "ip"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} is not a valid IP address", field)
    }
}

/// `json` - string field holding parseable JSON.
pub struct JsonRule;

#[async_trait]
impl Rule for JsonRule {
    async fn check(&self, ctx: &FieldContext<'_>) -> Result<RuleVerdict, EngineError> {
        let value = ctx.value();
        if skippable(value) {
            return Ok(RuleVerdict::Pass);
        }
        let valid = value
            .and_then(|v| v.as_str())
            .map(|text| serde_json::from_str::<Value>(text).is_ok())
            .unwrap_or(false);
        Ok(if valid { RuleVerdict::Pass } else { ctx.fail() })
    }

    fn name(&self) -> &str {
        "json"
    }

    fn default_message(&self, field: &str, _args: &[String]) -> String {
        format!("{} is not valid JSON", field)
    }
}

//! Rule-spec parsing and compiled schemas
//!
//! A rule spec is a pipe-separated string of rule tokens, each `name` or
//! `name:arg1,arg2,...`. Arguments stay raw strings; coercion, if any,
//! happens inside the rule implementation. Parsing is deterministic and
//! side-effect-free - token order drives stop-on-first-error semantics.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One rule invocation parsed out of a spec string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,
    pub args: Vec<String>,
}

/// Custom error messages, keyed `"field.rule"` with a `"rule"` fallback.
pub type MessageMap = HashMap<String, String>;

/// Look up the custom message for a field/rule pair.
pub fn message_for<'a>(messages: &'a MessageMap, field: &str, rule: &str) -> Option<&'a str> {
    messages
        .get(&format!("{}.{}", field, rule))
        .or_else(|| messages.get(rule))
        .map(String::as_str)
}

/// Parse a pipe-separated rule spec into ordered descriptors.
///
/// `"required|email|unique:users,email"` becomes three descriptors with the
/// last carrying args `["users", "email"]`. Empty specs and empty tokens are
/// rejected as [`EngineError::MalformedRuleSpec`].
pub fn parse_rule_spec(field: &str, spec: &str) -> Result<Vec<RuleDescriptor>, EngineError> {
    if spec.trim().is_empty() {
        return Err(EngineError::MalformedRuleSpec {
            field: field.to_string(),
            detail: "empty rule spec".to_string(),
        });
    }

    let mut descriptors = Vec::new();
    for token in spec.split('|') {
        let token = token.trim();
        if token.is_empty() {
            return Err(EngineError::MalformedRuleSpec {
                field: field.to_string(),
                detail: "empty rule token".to_string(),
            });
        }

        let (name, args) = match token.split_once(':') {
            Some((name, raw_args)) => (
                name.trim(),
                raw_args.split(',').map(|arg| arg.trim().to_string()).collect(),
            ),
            None => (token, Vec::new()),
        };

        if name.is_empty() {
            return Err(EngineError::MalformedRuleSpec {
                field: field.to_string(),
                detail: format!("rule token '{}' has no name", token),
            });
        }

        descriptors.push(RuleDescriptor {
            name: name.to_string(),
            args,
        });
    }

    Ok(descriptors)
}

/// A compiled schema: fields in declaration order with their parsed rules.
///
/// Declaration order is contractual - it decides which field reports first in
/// stop-on-first-error mode and the ordering of the final outcome.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Vec<RuleDescriptor>)>,
}

impl Schema {
    /// Compile `(field, spec)` pairs, failing on the first malformed spec.
    pub fn parse<I, F, S>(specs: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (F, S)>,
        F: AsRef<str>,
        S: AsRef<str>,
    {
        let mut fields = Vec::new();
        for (field, spec) in specs {
            let field = field.as_ref();
            fields.push((field.to_string(), parse_rule_spec(field, spec.as_ref())?));
        }
        Ok(Self { fields })
    }

    /// Fields and their rules, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[RuleDescriptor])> {
        self.fields
            .iter()
            .map(|(field, rules)| (field.as_str(), rules.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_args() {
        let rules = parse_rule_spec("email", "required|email|unique:users,email").unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].name, "required");
        assert!(rules[0].args.is_empty());
        assert_eq!(rules[2].name, "unique");
        assert_eq!(rules[2].args, vec!["users", "email"]);
    }

    #[test]
    fn parsing_is_deterministic() {
        let first = parse_rule_spec("age", "integer|range:18,99").unwrap();
        let second = parse_rule_spec("age", "integer|range:18,99").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_empty_spec() {
        assert!(matches!(
            parse_rule_spec("email", "   "),
            Err(EngineError::MalformedRuleSpec { .. })
        ));
    }

    #[test]
    fn rejects_empty_token() {
        assert!(matches!(
            parse_rule_spec("email", "required||email"),
            Err(EngineError::MalformedRuleSpec { .. })
        ));
    }

    #[test]
    fn rejects_nameless_token() {
        assert!(matches!(
            parse_rule_spec("email", "required|:users"),
            Err(EngineError::MalformedRuleSpec { .. })
        ));
    }

    #[test]
    fn schema_keeps_declaration_order() {
        let schema = Schema::parse([("email", "required|email"), ("password", "required")]).unwrap();
        let fields: Vec<&str> = schema.fields().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn message_lookup_prefers_field_scope() {
        let mut messages = MessageMap::new();
        messages.insert("required".to_string(), "this field is required".to_string());
        messages.insert("email.required".to_string(), "we need your email".to_string());

        assert_eq!(
            message_for(&messages, "email", "required"),
            Some("we need your email")
        );
        assert_eq!(
            message_for(&messages, "password", "required"),
            Some("this field is required")
        );
        assert_eq!(message_for(&messages, "password", "min"), None);
    }
}

//! Error message formatters
//!
//! A formatter shapes the recorded field errors into the envelope a response
//! needs. `plain` (the default) maps each field to its message list;
//! `json_api` produces a JSON:API style error array.

use crate::outcome::FieldError;
use crate::registry::RuleRegistry;
use serde_json::{json, Value};
use std::sync::Arc;

/// Strategy for shaping field errors into a response envelope.
pub trait Formatter: Send + Sync {
    fn format(&self, errors: &[FieldError]) -> Value;

    fn name(&self) -> &str;
}

/// `{"email": ["email is required"], ...}`
pub struct PlainFormatter;

impl Formatter for PlainFormatter {
    fn format(&self, errors: &[FieldError]) -> Value {
        let mut envelope = serde_json::Map::new();
        for entry in errors {
            envelope.insert(entry.field.clone(), json!(entry.messages));
        }
        Value::Object(envelope)
    }

    fn name(&self) -> &str {
        "plain"
    }
}

/// `{"errors": [{"source": {"pointer": "email"}, "detail": "..."}]}`
pub struct JsonApiFormatter;

impl Formatter for JsonApiFormatter {
    fn format(&self, errors: &[FieldError]) -> Value {
        let entries: Vec<Value> = errors
            .iter()
            .flat_map(|entry| {
                entry.messages.iter().map(|message| {
                    json!({
                        "source": { "pointer": entry.field },
                        "detail": message,
                    })
                })
            })
            .collect();
        json!({ "errors": entries })
    }

    fn name(&self) -> &str {
        "json_api"
    }
}

pub(crate) fn register_all(registry: &RuleRegistry) {
    registry.register_formatter("plain", Arc::new(PlainFormatter));
    registry.register_formatter("json_api", Arc::new(JsonApiFormatter));
}

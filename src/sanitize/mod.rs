//! Sanitization - input transforms applied before validation
//!
//! Sanitizers run over a copy of the data object; the caller's input is never
//! mutated. Fields without a sanitization rule pass through unchanged, and
//! absent fields are left absent.

pub mod builtin;

use crate::error::{EngineError, RuleKind};
use crate::registry::RuleRegistry;
use crate::schema::Schema;
use crate::value::{get_path, set_path};
use serde_json::Value;

/// A named sanitizer; transforms one field value.
///
/// Sanitizers are pure transforms, so the trait is synchronous. A returned
/// error aborts the whole pass as [`EngineError::Sanitization`].
pub trait Sanitizer: Send + Sync {
    fn apply(&self, value: &Value, args: &[String]) -> Result<Value, String>;

    fn name(&self) -> &str;
}

/// Apply a sanitization schema, returning a new data object.
pub(crate) fn run(
    registry: &RuleRegistry,
    data: &Value,
    schema: &Schema,
) -> Result<Value, EngineError> {
    let mut output = data.clone();
    for (field, descriptors) in schema.fields() {
        let Some(original) = get_path(data, field) else {
            continue;
        };
        let mut value = original.clone();
        for descriptor in descriptors {
            let sanitizer =
                registry
                    .sanitizer(&descriptor.name)
                    .ok_or_else(|| EngineError::UnknownRule {
                        kind: RuleKind::Sanitization,
                        name: descriptor.name.clone(),
                    })?;
            value = sanitizer
                .apply(&value, &descriptor.args)
                .map_err(|detail| EngineError::Sanitization {
                    name: descriptor.name.clone(),
                    field: field.to_string(),
                    detail,
                })?;
        }
        set_path(&mut output, field, value);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_is_never_mutated() {
        let registry = RuleRegistry::new();
        let data = json!({"email": "  A@B.COM  "});
        let schema = Schema::parse([("email", "trim|lower_case")]).unwrap();

        let sanitized = run(&registry, &data, &schema).unwrap();

        assert_eq!(sanitized, json!({"email": "a@b.com"}));
        assert_eq!(data, json!({"email": "  A@B.COM  "}));
    }

    #[test]
    fn empty_schema_is_identity() {
        let registry = RuleRegistry::new();
        let data = json!({"email": "  A@B.COM  ", "age": 3});
        let sanitized = run(&registry, &data, &Schema::default()).unwrap();
        assert_eq!(sanitized, data);
    }

    #[test]
    fn absent_fields_stay_absent() {
        let registry = RuleRegistry::new();
        let data = json!({"name": "bob"});
        let schema = Schema::parse([("email", "trim")]).unwrap();
        let sanitized = run(&registry, &data, &schema).unwrap();
        assert_eq!(sanitized, json!({"name": "bob"}));
    }

    #[test]
    fn unknown_sanitizer_fails_loudly() {
        let registry = RuleRegistry::new();
        let data = json!({"email": "a@b.com"});
        let schema = Schema::parse([("email", "frobnicate")]).unwrap();
        let result = run(&registry, &data, &schema);
        assert!(matches!(
            result,
            Err(EngineError::UnknownRule {
                kind: RuleKind::Sanitization,
                ..
            })
        ));
    }
}

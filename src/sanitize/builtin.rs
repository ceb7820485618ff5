//! Built-in sanitizers
//!
//! String-only transforms pass non-string values through untouched; the
//! coercions (`to_int`, `to_boolean`) accept strings and numbers and fail on
//! anything else.

use super::Sanitizer;
use crate::registry::RuleRegistry;
use serde_json::Value;
use std::sync::Arc;

fn map_string(value: &Value, transform: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(text) => Value::String(transform(text)),
        other => other.clone(),
    }
}

/// `trim` - strip surrounding whitespace.
pub struct Trim;

impl Sanitizer for Trim {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| text.trim().to_string()))
    }

    fn name(&self) -> &str {
        "trim"
    }
}

/// `lower_case`
pub struct LowerCase;

impl Sanitizer for LowerCase {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| text.to_lowercase()))
    }

    fn name(&self) -> &str {
        "lower_case"
    }
}

/// `upper_case`
pub struct UpperCase;

impl Sanitizer for UpperCase {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| text.to_uppercase()))
    }

    fn name(&self) -> &str {
        "upper_case"
    }
}

/// `title_case` - capitalize the first letter of each word.
pub struct TitleCase;

impl Sanitizer for TitleCase {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| {
            text.split_whitespace()
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => {
                            first.to_uppercase().collect::<String>()
                                + &chars.as_str().to_lowercase()
                        }
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        }))
    }

    fn name(&self) -> &str {
        "title_case"
    }
}

/// `normalize_email` - trim and lowercase the whole address.
pub struct NormalizeEmail;

impl Sanitizer for NormalizeEmail {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| text.trim().to_lowercase()))
    }

    fn name(&self) -> &str {
        "normalize_email"
    }
}

/// `slug` - lowercase, non-alphanumerics collapsed into single hyphens.
pub struct Slug;

impl Sanitizer for Slug {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| {
            let mut slug = String::with_capacity(text.len());
            let mut pending_hyphen = false;
            for ch in text.chars() {
                if ch.is_alphanumeric() {
                    if pending_hyphen && !slug.is_empty() {
                        slug.push('-');
                    }
                    pending_hyphen = false;
                    slug.extend(ch.to_lowercase());
                } else {
                    pending_hyphen = true;
                }
            }
            slug
        }))
    }

    fn name(&self) -> &str {
        "slug"
    }
}

/// `escape` - HTML-escape `& < > " '`.
pub struct Escape;

impl Sanitizer for Escape {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| {
            let mut escaped = String::with_capacity(text.len());
            for ch in text.chars() {
                match ch {
                    '&' => escaped.push_str("&amp;"),
                    '<' => escaped.push_str("&lt;"),
                    '>' => escaped.push_str("&gt;"),
                    '"' => escaped.push_str("&quot;"),
                    '\'' => escaped.push_str("&#x27;"),
                    other => escaped.push(other),
                }
            }
            escaped
        }))
    }

    fn name(&self) -> &str {
        "escape"
    }
}

/// `strip_tags` - drop `<...>` spans.
pub struct StripTags;

impl Sanitizer for StripTags {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        Ok(map_string(value, |text| {
            let mut stripped = String::with_capacity(text.len());
            let mut in_tag = false;
            for ch in text.chars() {
                match ch {
                    '<' => in_tag = true,
                    '>' => in_tag = false,
                    other if !in_tag => stripped.push(other),
                    _ => {}
                }
            }
            stripped
        }))
    }

    fn name(&self) -> &str {
        "strip_tags"
    }
}

/// `to_int` - coerce a string or number to an integer.
pub struct ToInt;

impl Sanitizer for ToInt {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        match value {
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Ok(Value::from(int))
                } else if let Some(float) = number.as_f64() {
                    Ok(Value::from(float.trunc() as i64))
                } else {
                    Err(format!("cannot convert {} to an integer", number))
                }
            }
            Value::String(text) => {
                let trimmed = text.trim();
                trimmed.parse::<i64>().map(Value::from).or_else(|_| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|float| float.is_finite())
                        .map(|float| Value::from(float.trunc() as i64))
                        .ok_or_else(|| format!("cannot convert '{}' to an integer", text))
                })
            }
            other => Err(format!("cannot convert {} to an integer", other)),
        }
    }

    fn name(&self) -> &str {
        "to_int"
    }
}

/// `to_boolean` - truthy strings and numbers become `true`, the rest `false`.
pub struct ToBoolean;

impl Sanitizer for ToBoolean {
    fn apply(&self, value: &Value, _args: &[String]) -> Result<Value, String> {
        let flag = match value {
            Value::Bool(flag) => *flag,
            Value::String(text) => {
                matches!(text.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
            }
            Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
            _ => false,
        };
        Ok(Value::Bool(flag))
    }

    fn name(&self) -> &str {
        "to_boolean"
    }
}

pub(crate) fn register_all(registry: &RuleRegistry) {
    registry.register_sanitizer("trim", Arc::new(Trim));
    registry.register_sanitizer("lower_case", Arc::new(LowerCase));
    registry.register_sanitizer("upper_case", Arc::new(UpperCase));
    registry.register_sanitizer("title_case", Arc::new(TitleCase));
    registry.register_sanitizer("normalize_email", Arc::new(NormalizeEmail));
    registry.register_sanitizer("slug", Arc::new(Slug));
    registry.register_sanitizer("escape", Arc::new(Escape));
    registry.register_sanitizer("strip_tags", Arc::new(StripTags));
    registry.register_sanitizer("to_int", Arc::new(ToInt));
    registry.register_sanitizer("to_boolean", Arc::new(ToBoolean));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_transforms() {
        assert_eq!(Trim.apply(&json!("  hi  "), &[]).unwrap(), json!("hi"));
        assert_eq!(LowerCase.apply(&json!("ABC"), &[]).unwrap(), json!("abc"));
        assert_eq!(
            TitleCase.apply(&json!("hello rust world"), &[]).unwrap(),
            json!("Hello Rust World")
        );
        assert_eq!(
            Slug.apply(&json!("Hello, Rust World!"), &[]).unwrap(),
            json!("hello-rust-world")
        );
        assert_eq!(
            Escape.apply(&json!("<b>\"hi\" & 'bye'</b>"), &[]).unwrap(),
            json!("&lt;b&gt;&quot;hi&quot; &amp; &#x27;bye&#x27;&lt;/b&gt;")
        );
        assert_eq!(
            StripTags.apply(&json!("<p>hello <b>world</b></p>"), &[]).unwrap(),
            json!("hello world")
        );
    }

    #[test]
    fn string_transforms_pass_non_strings_through() {
        assert_eq!(Trim.apply(&json!(42), &[]).unwrap(), json!(42));
        assert_eq!(LowerCase.apply(&json!(null), &[]).unwrap(), json!(null));
    }

    #[test]
    fn coercions() {
        assert_eq!(ToInt.apply(&json!("42"), &[]).unwrap(), json!(42));
        assert_eq!(ToInt.apply(&json!("3.9"), &[]).unwrap(), json!(3));
        assert_eq!(ToInt.apply(&json!(7.2), &[]).unwrap(), json!(7));
        assert!(ToInt.apply(&json!("abc"), &[]).is_err());
        assert!(ToInt.apply(&json!([1]), &[]).is_err());
        // non-finite floats must not saturate-cast into an integer
        assert!(ToInt.apply(&json!("NaN"), &[]).is_err());
        assert!(ToInt.apply(&json!("inf"), &[]).is_err());
        assert!(ToInt.apply(&json!("-inf"), &[]).is_err());

        assert_eq!(ToBoolean.apply(&json!("Yes"), &[]).unwrap(), json!(true));
        assert_eq!(ToBoolean.apply(&json!(0), &[]).unwrap(), json!(false));
        assert_eq!(ToBoolean.apply(&json!("nope"), &[]).unwrap(), json!(false));
    }
}

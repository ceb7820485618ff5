//! Built-in validation rules
//!
//! One module per rule family, registered together at registry construction.
//! Every rule except the presence family skips absent/null values - pair
//! them with `required` when the field must exist.

mod compare;
mod numeric;
mod presence;
mod string;

pub use compare::{DifferentRule, InRule, NotInRule, SameRule};
pub use numeric::{BooleanRule, FloatRule, IntegerRule, RangeRule};
pub use presence::{AcceptedRule, RequiredRule};
pub use string::{AlphaNumericRule, EmailRule, IpRule, JsonRule, MaxRule, MinRule, RegexRule, UrlRule};

use crate::registry::RuleRegistry;
use serde_json::Value;
use std::sync::Arc;

/// Non-presence rules pass on absent or null fields.
pub(crate) fn skippable(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Scalar value as text. Form input arrives stringly-typed, so `"42"` and
/// `42` behave alike for rules that compare against spec arguments.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn register_all(registry: &RuleRegistry) {
    registry.register_rule("required", Arc::new(RequiredRule));
    registry.register_rule("accepted", Arc::new(AcceptedRule));
    registry.register_rule("email", Arc::new(EmailRule));
    registry.register_rule("url", Arc::new(UrlRule));
    registry.register_rule("alpha_numeric", Arc::new(AlphaNumericRule));
    registry.register_rule("min", Arc::new(MinRule));
    registry.register_rule("max", Arc::new(MaxRule));
    registry.register_rule("regex", Arc::new(RegexRule));
    registry.register_rule("ip", Arc::new(IpRule));
    registry.register_rule("json", Arc::new(JsonRule));
    registry.register_rule("integer", Arc::new(IntegerRule));
    registry.register_rule("float", Arc::new(FloatRule));
    registry.register_rule("boolean", Arc::new(BooleanRule));
    registry.register_rule("range", Arc::new(RangeRule));
    registry.register_rule("in", Arc::new(InRule));
    registry.register_rule("not_in", Arc::new(NotInRule));
    registry.register_rule("same", Arc::new(SameRule));
    registry.register_rule("different", Arc::new(DifferentRule));
}

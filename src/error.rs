//! Engine-level error taxonomy
//!
//! These are developer-facing faults: a rule spec that references nothing,
//! a spec string the parser cannot tokenize, a sanitizer blowing up. Field
//! failures are not errors - they aggregate into the
//! [`ValidationOutcome`](crate::outcome::ValidationOutcome) instead.

use thiserror::Error;

/// Which registry namespace a lookup ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Validation,
    Sanitization,
    Formatter,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Validation => write!(f, "validation"),
            RuleKind::Sanitization => write!(f, "sanitization"),
            RuleKind::Formatter => write!(f, "formatter"),
        }
    }
}

/// Faults that abort a validation pass.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A spec referenced a name nothing has registered.
    #[error("unknown {kind} rule '{name}'")]
    UnknownRule { kind: RuleKind, name: String },

    /// The parser could not tokenize a rule spec, or a rule received
    /// arguments it cannot work with.
    #[error("malformed rule spec for field '{field}': {detail}")]
    MalformedRuleSpec { field: String, detail: String },

    /// The `authorize` hook declined the request before validation ran.
    #[error("request failed authorization")]
    Unauthorized,

    /// A sanitizer failed; the whole pass is abandoned.
    #[error("sanitizer '{name}' failed on field '{field}': {detail}")]
    Sanitization {
        name: String,
        field: String,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rule_names_the_namespace() {
        let err = EngineError::UnknownRule {
            kind: RuleKind::Sanitization,
            name: "frobnicate".to_string(),
        };
        assert_eq!(err.to_string(), "unknown sanitization rule 'frobnicate'");
    }
}

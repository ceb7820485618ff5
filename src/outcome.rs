//! Validation outcome types

use serde::Serialize;

/// Messages recorded against one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub messages: Vec<String>,
}

/// Result of one validation pass.
///
/// Field order follows rule-spec declaration order. Created fresh per pass,
/// immutable once returned to the caller.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationOutcome {
    errors: Vec<FieldError>,
}

impl ValidationOutcome {
    /// True when no field recorded a failure.
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// All recorded failures, in rule-spec field order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages for a single field, if it failed.
    pub fn messages_for(&self, field: &str) -> Option<&[String]> {
        self.errors
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.messages.as_slice())
    }

    /// Names of the failing fields, in order.
    pub fn failed_fields(&self) -> Vec<&str> {
        self.errors.iter().map(|entry| entry.field.as_str()).collect()
    }

    pub(crate) fn record(&mut self, field: &str, message: String) {
        if let Some(entry) = self.errors.iter_mut().find(|entry| entry.field == field) {
            entry.messages.push(message);
        } else {
            self.errors.push(FieldError {
                field: field.to_string(),
                messages: vec![message],
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_recording_order() {
        let mut outcome = ValidationOutcome::default();
        outcome.record("email", "email is required".to_string());
        outcome.record("password", "password is required".to_string());
        outcome.record("email", "email is not a valid email".to_string());

        assert!(!outcome.passed());
        assert_eq!(outcome.failed_fields(), vec!["email", "password"]);
        assert_eq!(
            outcome.messages_for("email"),
            Some(&["email is required".to_string(), "email is not a valid email".to_string()][..])
        );
        assert_eq!(outcome.messages_for("age"), None);
    }
}

//! Step validation with per-field error reporting

use miette::Diagnostic;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::field::{Field, FieldValue};
use crate::core::flow::Flow;
use crate::schema::registry::SchemaRegistry;

/// A step failed validation
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{flow} step {} rejected: {summary}", .step + 1)]
#[diagnostic(
    code(signup::schema::validation_error),
    help("Correct the highlighted fields and try again")
)]
pub struct ValidationError {
    pub flow: Flow,
    pub step: usize,
    summary: String,

    #[related]
    violations: Vec<FieldViolation>,
}

/// A single failing field
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{}: {message}", .field.label())]
pub struct FieldViolation {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(flow: Flow, step: usize, violations: Vec<FieldViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            flow,
            step,
            summary,
            violations,
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Field that should receive input focus: the first failure in group order
    pub fn focus(&self) -> Option<Field> {
        self.violations.first().map(|v| v.field)
    }

    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }
}

/// Validates one step's field group against a flow's rule table
#[derive(Debug, Clone)]
pub struct Validator {
    registry: SchemaRegistry,
}

impl Validator {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn for_flow(flow: Flow) -> Self {
        Self::new(SchemaRegistry::for_flow(flow))
    }

    pub fn flow(&self) -> Flow {
        self.registry.flow()
    }

    /// Check a single field value
    pub fn validate_field(&self, field: Field, value: &FieldValue) -> Result<(), String> {
        match self.registry.get(field) {
            Some(rules) => rules.evaluate(value),
            None => Ok(()),
        }
    }

    /// Check only the fields of `step`; everything else is left alone
    pub fn validate_step(
        &self,
        step: usize,
        fields: &BTreeMap<Field, FieldValue>,
    ) -> Result<(), ValidationError> {
        let flow = self.flow();
        let violations: Vec<FieldViolation> = flow
            .group(step)
            .iter()
            .filter_map(|field| {
                let empty = field.empty_value();
                let value = fields.get(field).unwrap_or(&empty);
                self.validate_field(*field, value)
                    .err()
                    .map(|message| FieldViolation {
                        field: *field,
                        message,
                    })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(flow, step, violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(Field, FieldValue)]) -> BTreeMap<Field, FieldValue> {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_step_passes() {
        let validator = Validator::for_flow(Flow::Registration);
        let values = fields(&[
            (Field::DialCode, "+33".into()),
            (Field::PhoneNumber, "5551234".into()),
        ]);
        assert!(validator.validate_step(0, &values).is_ok());
    }

    #[test]
    fn test_unset_fields_read_as_empty() {
        let validator = Validator::for_flow(Flow::Profile);
        let err = validator.validate_step(0, &BTreeMap::new()).unwrap_err();
        assert_eq!(err.violations().len(), 5);
        assert_eq!(err.focus(), Some(Field::Agreement));
        assert_eq!(
            err.message_for(Field::Agreement),
            Some("You must accept Terms and Use")
        );
        assert_eq!(err.to_string(), "profile step 1 rejected: 5 errors");
    }

    #[test]
    fn test_other_steps_ignored() {
        let validator = Validator::for_flow(Flow::Registration);
        let values = fields(&[
            (Field::PhoneNumber, "not digits".into()),
            (Field::ConfirmationCode, "1234".into()),
        ]);
        assert!(validator.validate_step(1, &values).is_ok());
        assert!(validator.validate_step(0, &values).is_err());
    }

    #[test]
    fn test_focus_follows_group_order() {
        let validator = Validator::for_flow(Flow::Registration);
        let values = fields(&[
            (Field::Email, "nope".into()),
            (Field::Password, "short".into()),
        ]);
        let err = validator.validate_step(2, &values).unwrap_err();
        assert_eq!(err.focus(), Some(Field::Email));
        assert_eq!(err.violations()[1].field, Field::Password);
        assert_eq!(err.to_string(), "registration step 3 rejected: 2 errors");
    }
}

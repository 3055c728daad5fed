//! Validation utilities.

use crate::{FieldError, RosterError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `RosterError` on failure.
    fn validate_request(&self) -> Result<(), RosterError> {
        self.validate().map_err(RosterError::from)
    }
}

impl<T: Validate> ValidateExt for T {}

impl From<ValidationErrors> for RosterError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: (*field).to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string),
                    code: error.code.to_string(),
                })
            })
            .collect();
        // HashMap order is not stable
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        Self::ValidationWithFields(field_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, max = 3))]
        code: String,
        #[validate(range(min = 0))]
        amount: i32,
    }

    #[test]
    fn test_validate_request_collects_every_field() {
        let probe = Probe {
            code: "toolong".to_string(),
            amount: -1,
        };
        let err = probe.validate_request().unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "amount");
        assert_eq!(fields[1].field, "code");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_validate_request_passes() {
        let probe = Probe {
            code: "ok".to_string(),
            amount: 3,
        };
        assert!(probe.validate_request().is_ok());
    }
}

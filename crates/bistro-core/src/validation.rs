//! Validation utilities.

use crate::{BistroError, FieldError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `BistroError` on failure.
    fn validate_request(&self) -> Result<(), BistroError> {
        self.validate().map_err(validation_errors_to_bistro_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
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
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `BistroError`.
#[must_use]
pub fn validation_errors_to_bistro_error(errors: ValidationErrors) -> BistroError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    BistroError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a price is a finite, non-negative amount.
    pub fn valid_price(price: f64) -> Result<(), ValidationError> {
        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError::new("invalid_price"));
        }
        Ok(())
    }
}

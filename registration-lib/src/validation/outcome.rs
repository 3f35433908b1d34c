use crate::error::{FieldValidationError, ValidationErrorKind};
use crate::field::FieldName;

/// Result of evaluating one field.
///
/// Produced fresh for every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Message for the user when `valid` is false.
    pub message: Option<String>,
    /// The value after normalization, when evaluation got that far.
    pub normalized_value: Option<String>,
    /// Which step rejected the value.
    pub kind: Option<ValidationErrorKind>,
    /// Corrected value the user probably meant (email typos).
    pub suggestion: Option<String>,
}

impl ValidationOutcome {
    /// A passing outcome with no normalized value (skipped evaluation).
    pub fn pass() -> Self {
        Self {
            valid: true,
            ..Default::default()
        }
    }

    /// A passing outcome carrying the normalized value.
    pub fn pass_with(normalized: impl Into<String>) -> Self {
        Self {
            valid: true,
            normalized_value: Some(normalized.into()),
            ..Default::default()
        }
    }

    /// A failing outcome.
    pub fn fail(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.normalized_value = Some(normalized.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Converts a failing outcome into an error for `field`.
    pub fn to_error(&self, field: FieldName) -> Option<FieldValidationError> {
        if self.valid {
            return None;
        }
        Some(FieldValidationError::new(
            field,
            self.kind.unwrap_or(ValidationErrorKind::ValidationInternalError),
            self.message.clone().unwrap_or_default(),
        ))
    }
}

//! Validation error types

use crate::field::FieldName;

/// The step of field evaluation that rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A required field was empty or whitespace-only.
    RequiredFieldMissing,
    /// The value was longer than the rule's maximum length.
    LengthExceeded,
    /// The normalized value did not match the rule's pattern.
    PatternMismatch,
    /// The field's custom check rejected the value.
    CustomRuleFailed,
    /// The custom check itself failed unexpectedly.
    ValidationInternalError,
}

impl ValidationErrorKind {
    /// Returns a stable identifier for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequiredFieldMissing => "required",
            Self::LengthExceeded => "max_length",
            Self::PatternMismatch => "pattern",
            Self::CustomRuleFailed => "custom",
            Self::ValidationInternalError => "internal",
        }
    }
}

/// Error information for a specific field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationError {
    /// The field that failed validation.
    pub field: FieldName,
    /// Which evaluation step failed.
    pub kind: ValidationErrorKind,
    /// Human-readable validation error message.
    pub message: String,
}

impl FieldValidationError {
    /// Creates a new field validation error.
    pub fn new(field: FieldName, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.kind.code())
    }
}

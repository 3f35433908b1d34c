//! Field and form validation.
//!
//! [`FieldValidator`] evaluates one value against its [`FieldRule`]; the
//! [`FormValidator`] runs it over a whole [`FormSnapshot`], tracks which
//! fields the user has touched and aggregates messages per field.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use registration_lib::field::{FieldName, FormSnapshot};
//! use registration_lib::rules::RuleRegistry;
//! use registration_lib::validation::FormValidator;
//!
//! # tokio_test_block(async {
//! let validator = FormValidator::new(Arc::new(RuleRegistry::standard()));
//! let snapshot = FormSnapshot::new().with(FieldName::Name, "田中太郎");
//!
//! assert!(!validator.validate_form(&snapshot).await);
//! assert!(!validator.field_errors(FieldName::Name).is_empty());
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! [`FieldRule`]: crate::rules::FieldRule
//! [`FormSnapshot`]: crate::field::FormSnapshot

mod field;
mod form;
mod outcome;
mod strength;

pub use field::{FieldValidator, INTERNAL_ERROR_MESSAGE, REQUIRED_MESSAGE, length_message};
pub use form::{FieldState, FormReport, FormValidator};
pub use outcome::ValidationOutcome;
pub use strength::{CharClasses, PASSWORD_SYMBOLS, PasswordStrength};

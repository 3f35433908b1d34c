//! Member registration library
//!
//! Field validation, view navigation and the submission flow behind a
//! three-screen registration form (input, confirmation, completion). All
//! presentation and network state is reached through the traits in
//! [`collab`], so the same flow runs against a browser bridge, a terminal or
//! the in-memory collaborators used by tests.

pub mod collab;
pub mod config;
pub mod error;
pub mod field;
pub mod flow;
pub mod notification;
pub mod rules;
pub mod validation;
pub mod view;

pub use config::RegistrationConfig;
pub use field::{FieldName, FormSnapshot};
pub use flow::{Collaborators, RegistrationFlow};
pub use rules::RuleRegistry;
pub use validation::{FormValidator, ValidationOutcome};
pub use view::{ViewId, ViewStateMachine};

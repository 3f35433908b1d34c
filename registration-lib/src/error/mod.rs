//! Error types

mod config;
mod lookup;
mod navigation;
mod submission;
mod validation;

pub use config::*;
pub use lookup::*;
pub use navigation::*;
pub use submission::*;
pub use validation::*;

/// Errors surfaced by the registration flow to its top-level caller.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The submission transport failed.
    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    /// Confirmation or registration was requested before a snapshot was
    /// captured.
    #[error("No form snapshot has been captured")]
    NoSnapshot,

    /// Registration was requested while the confirmation view is not shown.
    #[error("Registration is only possible from the confirmation view")]
    NotConfirming,

    /// A submission is already running.
    #[error("A submission is already in progress")]
    InProgress,
}

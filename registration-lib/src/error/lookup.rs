//! Custom check and lookup error types

/// Errors from an external postcode existence lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Network error during the lookup.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid lookup endpoint.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The lookup service answered with something unexpected.
    #[error("Unexpected lookup response: {0}")]
    Response(String),
}

/// Errors raised by a custom validation check.
///
/// These never reach the caller of a validation pass; they are logged and
/// reported as an internal validation error.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// A lookup the check depends on failed in a way the check cannot absorb.
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// The check failed for another reason.
    #[error("{0}")]
    Other(String),
}

impl CheckError {
    /// Creates an error from a plain message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

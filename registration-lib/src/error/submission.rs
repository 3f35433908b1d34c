//! Submission error types

/// Errors that can occur while submitting a registration.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Network error while sending the registration.
    #[error("Network error: {0}")]
    Network(String),

    /// The server did not answer in time.
    #[error("Timeout while waiting for the server")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or a generic one.
        message: String,
    },

    /// The transport refused the registration for another reason.
    #[error("Registration rejected: {0}")]
    Rejected(String),
}

impl SubmissionError {
    /// Creates a new server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Returns `true` if the failure came from the network layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` if the server did not respond in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

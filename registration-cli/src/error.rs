use std::path::PathBuf;

use registration_lib::error::{ConfigError, LookupError, SubmissionError};

/// Errors that stop a command before it can report a result.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to initialize logging: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid snapshot: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Postcode lookup setup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Submission setup failed: {0}")]
    Submission(#[from] SubmissionError),
}

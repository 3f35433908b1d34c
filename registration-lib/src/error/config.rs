//! Configuration error types

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configured URL is not valid.
    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

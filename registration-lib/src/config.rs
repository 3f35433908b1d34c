//! Configuration for transitions, collaborators and the registration flow.
//!
//! Every config type has sensible defaults and builder-style setters. A
//! [`RegistrationConfig`] can also be loaded from JSON, where durations are
//! given in milliseconds and every key is optional:
//!
//! ```
//! use std::time::Duration;
//! use registration_lib::config::RegistrationConfig;
//!
//! let config = RegistrationConfig::from_json_str(
//!     r#"{ "transition": { "duration_ms": 150 }, "postcode": { "timeout_ms": null } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.transition.duration, Duration::from_millis(150));
//! assert_eq!(config.postcode.timeout, None);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::view::Easing;

/// Timing of a view transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    /// Length of the fade window. No other transition may start inside it.
    ///
    /// Default: 300 ms
    pub duration: Duration,

    /// Easing curve handed to the presenter for both fades.
    ///
    /// Default: ease-in-out
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseInOut,
        }
    }
}

impl TransitionConfig {
    /// Sets the fade window.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// A config with no animation window, for headless use.
    pub fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }
}

/// Settings for the HTTP postcode existence lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcodeLookupConfig {
    /// Lookup endpoint; the postcode is sent as the `zipcode` query parameter.
    pub endpoint: String,

    /// Request timeout. A timed-out lookup counts as a failed lookup, which
    /// never blocks validation.
    ///
    /// Default: 5 seconds
    pub timeout: Option<Duration>,
}

impl Default for PostcodeLookupConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.zipaddress.net/".to_string(),
            timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl PostcodeLookupConfig {
    /// Sets the lookup endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets or clears the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Settings for the HTTP submission transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionConfig {
    /// Registration endpoint receiving the JSON snapshot.
    pub endpoint: String,

    /// Request timeout.
    ///
    /// Default: 30 seconds
    pub timeout: Option<Duration>,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/register".to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl SubmissionConfig {
    /// Sets the registration endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets or clears the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Timing of the registration flow's user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    /// Minimum time the submit control stays busy during registration.
    ///
    /// Default: 1 second
    pub min_submit_duration: Duration,

    /// How long notifications stay visible before dismissing themselves.
    ///
    /// Default: 3 seconds
    pub notification_duration: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            min_submit_duration: Duration::from_secs(1),
            notification_duration: Duration::from_secs(3),
        }
    }
}

impl FlowConfig {
    /// Sets the minimum busy window of the submit control.
    pub fn with_min_submit_duration(mut self, duration: Duration) -> Self {
        self.min_submit_duration = duration;
        self
    }

    /// Sets the notification lifetime.
    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }
}

/// All configuration for one registration flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationConfig {
    pub transition: TransitionConfig,
    pub postcode: PostcodeLookupConfig,
    pub submission: SubmissionConfig,
    pub flow: FlowConfig,
}

impl RegistrationConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON, filling unspecified keys with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        let config = raw.into_config();
        config.check_urls()?;
        Ok(config)
    }

    /// Loads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn check_urls(&self) -> Result<(), ConfigError> {
        for endpoint in [&self.postcode.endpoint, &self.submission.endpoint] {
            url::Url::parse(endpoint).map_err(|e| ConfigError::InvalidUrl(format!("{endpoint}: {e}")))?;
        }
        Ok(())
    }
}

// On-disk shape. `Option<Option<u64>>` distinguishes "key absent" (keep the
// default) from an explicit `null` (disable the timeout).

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    transition: RawTransition,
    postcode: RawEndpoint,
    submission: RawEndpoint,
    flow: RawFlow,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawTransition {
    duration_ms: Option<u64>,
    easing: Option<Easing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawEndpoint {
    endpoint: Option<String>,
    #[serde(deserialize_with = "explicit_option")]
    timeout_ms: Option<Option<u64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawFlow {
    min_submit_ms: Option<u64>,
    notification_ms: Option<u64>,
}

fn explicit_option<'de, D>(deserializer: D) -> Result<Option<Option<u64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(Some)
}

impl RawConfig {
    fn into_config(self) -> RegistrationConfig {
        let mut config = RegistrationConfig::default();

        if let Some(ms) = self.transition.duration_ms {
            config.transition.duration = Duration::from_millis(ms);
        }
        if let Some(easing) = self.transition.easing {
            config.transition.easing = easing;
        }

        if let Some(endpoint) = self.postcode.endpoint {
            config.postcode.endpoint = endpoint;
        }
        if let Some(timeout) = self.postcode.timeout_ms {
            config.postcode.timeout = timeout.map(Duration::from_millis);
        }

        if let Some(endpoint) = self.submission.endpoint {
            config.submission.endpoint = endpoint;
        }
        if let Some(timeout) = self.submission.timeout_ms {
            config.submission.timeout = timeout.map(Duration::from_millis);
        }

        if let Some(ms) = self.flow.min_submit_ms {
            config.flow.min_submit_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = self.flow.notification_ms {
            config.flow.notification_duration = Duration::from_millis(ms);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = RegistrationConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RegistrationConfig::default());
        assert_eq!(config.transition.duration, Duration::from_millis(300));
        assert_eq!(config.flow.notification_duration, Duration::from_secs(3));
    }

    #[test]
    fn overrides_are_applied() {
        let config = RegistrationConfig::from_json_str(
            r#"{
                "transition": { "easing": "linear" },
                "submission": { "endpoint": "https://example.com/register", "timeout_ms": 2000 },
                "flow": { "min_submit_ms": 0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.transition.easing, Easing::Linear);
        assert_eq!(config.submission.endpoint, "https://example.com/register");
        assert_eq!(config.submission.timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.flow.min_submit_duration, Duration::ZERO);
        assert_eq!(config.postcode, PostcodeLookupConfig::default());
    }

    #[test]
    fn rejects_unknown_keys_and_bad_urls() {
        assert!(matches!(
            RegistrationConfig::from_json_str(r#"{ "colour": "red" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RegistrationConfig::from_json_str(r#"{ "postcode": { "endpoint": "not a url" } }"#),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}

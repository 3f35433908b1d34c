//! Collaborator interfaces consumed by the validation engine, the view state
//! machine and the registration flow.
//!
//! The core never touches presentation state directly: it reads values from
//! a [`ValueSource`], reports messages to an [`ErrorSink`], drives screens
//! through a [`ViewPresenter`] and talks to the network through
//! [`SubmissionTransport`] and [`PostcodeLookup`]. In-memory implementations
//! live in [`memory`]; HTTP implementations in [`http`].

pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{LookupError, SubmissionError};
use crate::field::{FieldName, FormSnapshot};
use crate::notification::Notification;
use crate::view::{Fade, FocusTarget, ViewId};

/// Source of raw input values, keyed by field.
pub trait ValueSource: Send + Sync {
    /// Current value of a field (empty if the input is blank).
    fn value(&self, field: FieldName) -> String;

    /// Replaces the value of a field.
    fn set_value(&self, field: FieldName, value: &str);

    /// Makes a field non-interactive.
    fn disable(&self, field: FieldName);

    /// Makes a field interactive again.
    fn enable(&self, field: FieldName);
}

/// Destination of per-field error messages.
///
/// At most one message is active per field; showing a new one replaces it.
pub trait ErrorSink: Send + Sync {
    fn show_error(&self, field: FieldName, message: &str);
    fn hide_error(&self, field: FieldName);
}

/// What the server returned for a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmitReceipt {
    /// Optional message from the server.
    #[serde(default)]
    pub message: Option<String>,
    /// Full response body.
    #[serde(skip)]
    pub body: serde_json::Value,
}

/// Sends a captured snapshot to the registration backend.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// Submit once. The flow awaits exactly one call per registration attempt.
    async fn submit(&self, snapshot: &FormSnapshot) -> Result<SubmitReceipt, SubmissionError>;
}

/// Persistence of the single navigation hint token (a URL fragment in a
/// browser).
pub trait NavigationHintStore: Send + Sync {
    fn read(&self) -> Option<String>;
    fn write(&self, token: &str);
}

/// Draws view transitions. Called by the state machine in this order for a
/// transition: `fade_out`, then after the window `swap`, `fade_in`, `focus`.
pub trait ViewPresenter: Send + Sync {
    /// Start fading out the visible view.
    fn fade_out(&self, view: ViewId, fade: Fade);

    /// Hide `from` and make `to` visible.
    fn swap(&self, from: ViewId, to: ViewId);

    /// Start fading in the newly visible view.
    fn fade_in(&self, view: ViewId, fade: Fade);

    /// Show a view immediately, hiding every other one. Used for silent jumps.
    fn show(&self, view: ViewId);

    /// Move input focus.
    fn focus(&self, target: FocusTarget);
}

/// Existence check for Japanese postcodes.
#[async_trait]
pub trait PostcodeLookup: Send + Sync {
    /// Returns `Ok(false)` if the service reports that the postcode does not
    /// exist. Any `Err` is treated by the postcode rule as "skip, pass".
    async fn exists(&self, postcode: &str) -> Result<bool, LookupError>;
}

/// Flow-level feedback: notifications and the state of the submit control.
pub trait StatusSurface: Send + Sync {
    /// Show a self-dismissing notification.
    fn notify(&self, notification: Notification);

    /// Mark the submit control busy (disabled, loading) or interactive.
    fn set_submit_busy(&self, busy: bool);
}

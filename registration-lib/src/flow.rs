//! The registration flow: form → confirmation → complete.
//!
//! Ties the form validator and the view state machine to the collaborators.
//! Callers forward user events (input, blur, submit, register, back) and the
//! flow takes care of validation, navigation, submission and feedback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::collab::{
    ErrorSink, NavigationHintStore, StatusSurface, SubmissionTransport, ValueSource, ViewPresenter,
};
use crate::config::{FlowConfig, RegistrationConfig};
use crate::error::{FlowError, SubmissionError, TransitionError};
use crate::field::{FieldName, FormSnapshot};
use crate::notification::Notification;
use crate::rules::{PREFECTURES, RuleRegistry};
use crate::validation::{FormValidator, PasswordStrength, ValidationOutcome};
use crate::view::{ViewId, ViewStateMachine};

pub const EMPTY_VALUE_LABEL: &str = "未入力";
pub const REGISTERED_MESSAGE: &str = "登録が完了しました！";
pub const REGISTER_FAILED_MESSAGE: &str = "登録中にエラーが発生しました。もう一度お試しください。";
pub const NETWORK_FAILED_MESSAGE: &str =
    "ネットワークエラーが発生しました。インターネット接続を確認してください。";
pub const TIMEOUT_MESSAGE: &str = "サーバーの応答がありません。しばらく時間をおいて再度お試しください。";

/// Everything the flow talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub values: Arc<dyn ValueSource>,
    pub errors: Arc<dyn ErrorSink>,
    pub presenter: Arc<dyn ViewPresenter>,
    pub hints: Arc<dyn NavigationHintStore>,
    pub status: Arc<dyn StatusSurface>,
    pub transport: Arc<dyn SubmissionTransport>,
}

/// One user's pass through the registration screens.
pub struct RegistrationFlow {
    form: FormValidator,
    views: ViewStateMachine,
    values: Arc<dyn ValueSource>,
    status: Arc<dyn StatusSurface>,
    transport: Arc<dyn SubmissionTransport>,
    config: FlowConfig,
    snapshot: Mutex<Option<FormSnapshot>>,
    submitting: AtomicBool,
}

impl RegistrationFlow {
    pub fn new(registry: Arc<RuleRegistry>, collab: Collaborators, config: &RegistrationConfig) -> Self {
        let form = FormValidator::new(registry).with_error_sink(collab.errors);
        let views = ViewStateMachine::new(collab.presenter, collab.hints, config.transition);

        Self {
            form,
            views,
            values: collab.values,
            status: collab.status,
            transport: collab.transport,
            config: config.flow,
            snapshot: Mutex::new(None),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn form(&self) -> &FormValidator {
        &self.form
    }

    pub fn views(&self) -> &ViewStateMachine {
        &self.views
    }

    fn stored(&self) -> MutexGuard<'_, Option<FormSnapshot>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The snapshot awaiting confirmation, if any.
    pub fn snapshot(&self) -> Option<FormSnapshot> {
        self.stored().clone()
    }

    /// Restores the last view from the navigation hint.
    pub fn initialize(&self) -> Option<ViewId> {
        self.views.restore()
    }

    /// Input event: validates only once the field has been touched.
    pub async fn on_input(&self, field: FieldName) -> ValidationOutcome {
        let value = self.values.value(field);
        self.form.validate_field(field, &value, false).await
    }

    /// Blur event: marks the field touched and validates it.
    pub async fn on_blur(&self, field: FieldName) -> ValidationOutcome {
        let value = self.values.value(field);
        self.form.validate_field(field, &value, true).await
    }

    /// Current password strength, for a strength meter.
    pub fn password_strength(&self) -> PasswordStrength {
        PasswordStrength::evaluate(&self.values.value(FieldName::Password))
    }

    /// Options for the prefecture select.
    pub fn prefecture_options(&self) -> &'static [&'static str] {
        &PREFECTURES
    }

    /// Submits the form for confirmation.
    ///
    /// Captures a snapshot, validates it and, if valid, keeps it and moves to
    /// the confirmation view. Returns `false` when the form is invalid, when a
    /// submission is already running, or when the transition was dropped.
    pub async fn submit_form(&self) -> bool {
        let Some(_busy) = Busy::acquire(&self.submitting) else {
            log::debug!("Ignoring submit while another submission is running");
            return false;
        };

        let snapshot = FormSnapshot::capture(|field| self.values.value(field));
        for field in FieldName::ALL {
            self.values.disable(field);
        }
        let valid = self.form.validate_form(&snapshot).await;
        for field in FieldName::ALL {
            self.values.enable(field);
        }

        if !valid {
            return false;
        }

        *self.stored() = Some(snapshot);
        match self.views.transit_to(ViewId::Confirmation, false).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not show confirmation: {e}");
                false
            }
        }
    }

    /// Label/value pairs for the confirmation view, in form order.
    pub fn confirmation_rows(&self) -> Result<Vec<(&'static str, String)>, FlowError> {
        let stored = self.stored();
        let snapshot = stored.as_ref().ok_or(FlowError::NoSnapshot)?;
        Ok(snapshot
            .iter()
            .map(|(field, value)| {
                let shown = if value.is_empty() { EMPTY_VALUE_LABEL } else { value };
                (field.label(), shown.to_string())
            })
            .collect())
    }

    /// Sends the confirmed snapshot.
    ///
    /// Only allowed while the confirmation view is shown. The submit control
    /// stays busy for at least the configured minimum window. On success the
    /// form is reset and the complete view shown. On failure the user gets a
    /// self-dismissing notification, the submit control becomes interactive
    /// again and the error is returned.
    pub async fn register(&self) -> Result<(), FlowError> {
        let Some(_busy) = Busy::acquire(&self.submitting) else {
            return Err(FlowError::InProgress);
        };
        let snapshot = self.snapshot().ok_or(FlowError::NoSnapshot)?;
        if !self.views.is_current(ViewId::Confirmation) {
            return Err(FlowError::NotConfirming);
        }

        self.status.set_submit_busy(true);
        let (result, ()) = tokio::join!(
            self.transport.submit(&snapshot),
            tokio::time::sleep(self.config.min_submit_duration),
        );

        match result {
            Ok(receipt) => {
                log::info!(
                    "Registration accepted{}",
                    receipt.message.map(|m| format!(": {m}")).unwrap_or_default()
                );
                self.status.notify(
                    Notification::success(REGISTERED_MESSAGE).with_duration(self.config.notification_duration),
                );
                self.reset_form();
                if let Err(e) = self.views.transit_to(ViewId::Complete, false).await {
                    log::warn!("Could not show completion: {e}");
                }
                self.status.set_submit_busy(false);
                Ok(())
            }
            Err(e) => {
                log::error!("Registration failed: {e}");
                self.status.notify(
                    Notification::error(failure_message(&e)).with_duration(self.config.notification_duration),
                );
                self.status.set_submit_busy(false);
                Err(FlowError::Submission(e))
            }
        }
    }

    /// Back button on the confirmation view.
    ///
    /// Landing on the form drops the stored snapshot; the next submit
    /// captures a fresh one.
    pub async fn go_back(&self) -> Result<(), TransitionError> {
        self.views.go_back().await?;
        self.forget_snapshot_on_form();
        Ok(())
    }

    /// Browser back. From the complete view this reloads the flow; elsewhere
    /// it goes back through history.
    pub async fn on_browser_back(&self) -> Result<(), TransitionError> {
        if self.views.is_current(ViewId::Complete) {
            self.reload();
            return Ok(());
        }
        self.views.handle_history_pop().await?;
        self.forget_snapshot_on_form();
        Ok(())
    }

    fn forget_snapshot_on_form(&self) {
        if self.views.is_current(ViewId::Form) {
            *self.stored() = None;
        }
    }

    /// Clears every input, error and the stored snapshot.
    pub fn reset_form(&self) {
        for field in FieldName::ALL {
            self.values.set_value(field, "");
            self.values.enable(field);
        }
        self.form.clear_errors();
        *self.stored() = None;
    }

    /// Starts over from an empty form, as after a page reload.
    pub fn reload(&self) {
        self.reset_form();
        self.views.reset();
    }
}

fn failure_message(error: &SubmissionError) -> String {
    match error {
        SubmissionError::Network(_) => NETWORK_FAILED_MESSAGE.to_string(),
        SubmissionError::Timeout => TIMEOUT_MESSAGE.to_string(),
        SubmissionError::Server { status, message } if *status < 500 => message.clone(),
        _ => REGISTER_FAILED_MESSAGE.to_string(),
    }
}

/// Holds the submission flag for the duration of a submit or register call.
struct Busy<'a>(&'a AtomicBool);

impl<'a> Busy<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

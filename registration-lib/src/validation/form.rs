//! Whole-form validation with touched tracking and error aggregation.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;

use super::{FieldValidator, ValidationOutcome};
use crate::collab::ErrorSink;
use crate::error::FieldValidationError;
use crate::field::{FieldName, FormSnapshot};
use crate::rules::RuleRegistry;

/// Runtime record for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub touched: bool,
    pub errors: Vec<String>,
}

/// Per-field outcomes of one whole-form validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    outcomes: BTreeMap<FieldName, ValidationOutcome>,
}

impl FormReport {
    /// True if every field passed.
    pub fn is_valid(&self) -> bool {
        self.outcomes.values().all(ValidationOutcome::is_valid)
    }

    pub fn outcome(&self, field: FieldName) -> Option<&ValidationOutcome> {
        self.outcomes.get(&field)
    }

    /// Failing fields in form order.
    pub fn errors(&self) -> Vec<FieldValidationError> {
        self.outcomes
            .iter()
            .filter_map(|(field, outcome)| outcome.to_error(*field))
            .collect()
    }
}

/// Validates the registration form and keeps per-field state.
///
/// Validation passes on one instance never interleave: each pass holds an
/// async lock for its whole duration, including any lookups it waits on.
pub struct FormValidator {
    validator: FieldValidator,
    sink: Option<Arc<dyn ErrorSink>>,
    fields: Mutex<BTreeMap<FieldName, FieldState>>,
    pass: tokio::sync::Mutex<()>,
}

impl FormValidator {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            validator: FieldValidator::new(registry),
            sink: None,
            fields: Mutex::new(BTreeMap::new()),
            pass: tokio::sync::Mutex::new(()),
        }
    }

    /// Reports messages to `sink` as validation runs.
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        self.validator.registry()
    }

    fn fields(&self) -> MutexGuard<'_, BTreeMap<FieldName, FieldState>> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates every field of `snapshot` and reports overall validity.
    pub async fn validate_form(&self, snapshot: &FormSnapshot) -> bool {
        self.validate_snapshot(snapshot).await.is_valid()
    }

    /// Like [`validate_form`](Self::validate_form), returning every outcome.
    ///
    /// All fields are marked touched and evaluated concurrently. The error
    /// map is rebuilt from scratch and only holds entries when the form is
    /// invalid.
    pub async fn validate_snapshot(&self, snapshot: &FormSnapshot) -> FormReport {
        let _pass = self.pass.lock().await;

        let fields: Vec<FieldName> = self.registry().fields().collect();
        {
            let mut state = self.fields();
            state.clear();
            for field in &fields {
                state.entry(*field).or_default().touched = true;
            }
        }

        let outcomes = join_all(fields.iter().map(|field| async move {
            let outcome = self.validator.validate(*field, snapshot.get(*field), true).await;
            (*field, outcome)
        }))
        .await;

        let report = FormReport {
            outcomes: outcomes.into_iter().collect(),
        };

        if !report.is_valid() {
            let mut state = self.fields();
            for error in report.errors() {
                state.entry(error.field).or_default().errors.push(error.message);
            }
        }

        if let Some(sink) = &self.sink {
            for (field, outcome) in &report.outcomes {
                match &outcome.message {
                    Some(message) if !outcome.valid => sink.show_error(*field, message),
                    _ => sink.hide_error(*field),
                }
            }
        }

        log::debug!(
            "Form validation finished: valid={}, failing={:?}",
            report.is_valid(),
            report.errors().iter().map(|e| e.field.as_str()).collect::<Vec<_>>()
        );

        report
    }

    /// Validates one field as the user edits it.
    ///
    /// `is_touch_event` is true for blur events. Until a field has been
    /// touched, input events pass without evaluation so errors do not appear
    /// while the user is still typing for the first time.
    pub async fn validate_field(&self, field: FieldName, raw: &str, is_touch_event: bool) -> ValidationOutcome {
        let _pass = self.pass.lock().await;

        let touched = {
            let mut state = self.fields();
            let entry = state.entry(field).or_default();
            entry.touched |= is_touch_event;
            entry.touched
        };

        let outcome = self.validator.validate(field, raw, touched).await;
        if !touched {
            return outcome;
        }

        {
            let mut state = self.fields();
            let entry = state.entry(field).or_default();
            entry.errors.clear();
            if let Some(message) = outcome.message.as_ref().filter(|_| !outcome.valid) {
                entry.errors.push(message.clone());
            }
        }

        if let Some(sink) = &self.sink {
            match &outcome.message {
                Some(message) if !outcome.valid => sink.show_error(field, message),
                _ => sink.hide_error(field),
            }
        }

        outcome
    }

    /// Messages recorded for a field (empty if none).
    pub fn field_errors(&self, field: FieldName) -> Vec<String> {
        self.fields()
            .get(&field)
            .map(|state| state.errors.clone())
            .unwrap_or_default()
    }

    /// Every field with at least one recorded message.
    pub fn all_errors(&self) -> BTreeMap<FieldName, Vec<String>> {
        self.fields()
            .iter()
            .filter(|(_, state)| !state.errors.is_empty())
            .map(|(field, state)| (*field, state.errors.clone()))
            .collect()
    }

    pub fn is_touched(&self, field: FieldName) -> bool {
        self.fields().get(&field).is_some_and(|state| state.touched)
    }

    /// Forgets every touched flag and message, hiding displayed errors.
    pub fn clear_errors(&self) {
        self.fields().clear();
        if let Some(sink) = &self.sink {
            for field in self.registry().fields() {
                sink.hide_error(field);
            }
        }
    }
}

impl std::fmt::Debug for FormValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidator")
            .field("fields", &*self.fields())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

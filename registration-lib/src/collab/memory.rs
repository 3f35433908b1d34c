//! In-memory collaborators.
//!
//! Used by the command-line driver and by tests. Each type records what it
//! was asked to do so callers can inspect the result.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, RwLock};

use super::{ErrorSink, NavigationHintStore, StatusSurface, ValueSource, ViewPresenter};
use crate::field::{FieldName, FormSnapshot};
use crate::notification::Notification;
use crate::view::{Fade, FocusTarget, ViewId};

/// Field values held in memory.
#[derive(Debug, Default)]
pub struct MemoryValues {
    inner: RwLock<ValuesInner>,
}

#[derive(Debug, Default)]
struct ValuesInner {
    values: HashMap<FieldName, String>,
    disabled: BTreeSet<FieldName>,
}

impl MemoryValues {
    /// Creates an empty value source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a value source pre-filled from a snapshot.
    pub fn from_snapshot(snapshot: &FormSnapshot) -> Self {
        let values = snapshot
            .iter()
            .map(|(field, value)| (field, value.to_string()))
            .collect();
        Self {
            inner: RwLock::new(ValuesInner {
                values,
                disabled: BTreeSet::new(),
            }),
        }
    }

    /// Returns `true` if the field is currently disabled.
    pub fn is_disabled(&self, field: FieldName) -> bool {
        self.inner
            .read()
            .map(|g| g.disabled.contains(&field))
            .unwrap_or(false)
    }
}

impl ValueSource for MemoryValues {
    fn value(&self, field: FieldName) -> String {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.values.get(&field).cloned())
            .unwrap_or_default()
    }

    fn set_value(&self, field: FieldName, value: &str) {
        if let Ok(mut guard) = self.inner.write() {
            guard.values.insert(field, value.to_string());
        }
    }

    fn disable(&self, field: FieldName) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled.insert(field);
        }
    }

    fn enable(&self, field: FieldName) {
        if let Ok(mut guard) = self.inner.write() {
            guard.disabled.remove(&field);
        }
    }
}

/// Error sink that keeps the active message per field.
#[derive(Debug, Default)]
pub struct MemoryErrorSink {
    shown: RwLock<BTreeMap<FieldName, String>>,
}

impl MemoryErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The message currently shown for a field, if any.
    pub fn shown(&self, field: FieldName) -> Option<String> {
        self.shown.read().ok().and_then(|g| g.get(&field).cloned())
    }

    /// All active messages in form order.
    pub fn all(&self) -> Vec<(FieldName, String)> {
        self.shown
            .read()
            .map(|g| g.iter().map(|(f, m)| (*f, m.clone())).collect())
            .unwrap_or_default()
    }
}

impl ErrorSink for MemoryErrorSink {
    fn show_error(&self, field: FieldName, message: &str) {
        if let Ok(mut guard) = self.shown.write() {
            guard.insert(field, message.to_string());
        }
    }

    fn hide_error(&self, field: FieldName) {
        if let Ok(mut guard) = self.shown.write() {
            guard.remove(&field);
        }
    }
}

/// Navigation hint kept in memory.
#[derive(Debug, Default)]
pub struct MemoryHintStore {
    token: RwLock<Option<String>>,
}

impl MemoryHintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a token, as after a page reload.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl NavigationHintStore for MemoryHintStore {
    fn read(&self) -> Option<String> {
        self.token.read().ok().and_then(|g| g.clone())
    }

    fn write(&self, token: &str) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
    }
}

/// One call received by a [`RecordingPresenter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterEvent {
    FadeOut(ViewId, Fade),
    Swap { from: ViewId, to: ViewId },
    FadeIn(ViewId, Fade),
    Show(ViewId),
    Focus(FocusTarget),
}

/// Presenter that records calls and tracks which view is visible.
#[derive(Debug)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
    visible: Mutex<ViewId>,
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            visible: Mutex::new(ViewId::Form),
        }
    }
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far.
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// The view currently visible.
    pub fn visible(&self) -> ViewId {
        self.visible.lock().map(|g| *g).unwrap_or(ViewId::Form)
    }

    /// The last focus target, if focus was ever moved.
    pub fn last_focus(&self) -> Option<FocusTarget> {
        self.events().into_iter().rev().find_map(|event| match event {
            PresenterEvent::Focus(target) => Some(target),
            _ => None,
        })
    }

    fn record(&self, event: PresenterEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }

    fn set_visible(&self, view: ViewId) {
        if let Ok(mut guard) = self.visible.lock() {
            *guard = view;
        }
    }
}

impl ViewPresenter for RecordingPresenter {
    fn fade_out(&self, view: ViewId, fade: Fade) {
        self.record(PresenterEvent::FadeOut(view, fade));
    }

    fn swap(&self, from: ViewId, to: ViewId) {
        self.set_visible(to);
        self.record(PresenterEvent::Swap { from, to });
    }

    fn fade_in(&self, view: ViewId, fade: Fade) {
        self.record(PresenterEvent::FadeIn(view, fade));
    }

    fn show(&self, view: ViewId) {
        self.set_visible(view);
        self.record(PresenterEvent::Show(view));
    }

    fn focus(&self, target: FocusTarget) {
        self.record(PresenterEvent::Focus(target));
    }
}

/// Status surface that records notifications and the submit control state.
#[derive(Debug, Default)]
pub struct MemoryStatus {
    notifications: Mutex<Vec<Notification>>,
    busy_changes: Mutex<Vec<bool>>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification shown so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Every busy/interactive change of the submit control, in order.
    pub fn busy_changes(&self) -> Vec<bool> {
        self.busy_changes.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Whether the submit control is currently busy.
    pub fn is_busy(&self) -> bool {
        self.busy_changes().last().copied().unwrap_or(false)
    }
}

impl StatusSurface for MemoryStatus {
    fn notify(&self, notification: Notification) {
        log::info!("[{:?}] {}", notification.level, notification.message);
        if let Ok(mut guard) = self.notifications.lock() {
            guard.push(notification);
        }
    }

    fn set_submit_busy(&self, busy: bool) {
        if let Ok(mut guard) = self.busy_changes.lock() {
            guard.push(busy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_sink_keeps_one_message_per_field() {
        let sink = MemoryErrorSink::new();
        sink.show_error(FieldName::Email, "first");
        sink.show_error(FieldName::Email, "second");
        assert_eq!(sink.shown(FieldName::Email).as_deref(), Some("second"));
        sink.hide_error(FieldName::Email);
        assert!(sink.all().is_empty());
    }

    #[test]
    fn values_track_disabled_fields() {
        let values = MemoryValues::new();
        values.set_value(FieldName::City, "札幌市");
        values.disable(FieldName::City);
        assert!(values.is_disabled(FieldName::City));
        values.enable(FieldName::City);
        assert!(!values.is_disabled(FieldName::City));
        assert_eq!(values.value(FieldName::City), "札幌市");
        assert_eq!(values.value(FieldName::Remarks), "");
    }
}

use std::time::Duration;

/// Default lifetime of a notification before it dismisses itself.
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// Severity of a notification, used by the surface to pick its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, self-dismissing message for the user.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use registration_lib::notification::{Notification, NotificationLevel};
///
/// let note = Notification::error("登録中にエラーが発生しました。")
///     .with_duration(Duration::from_secs(5));
/// assert_eq!(note.level, NotificationLevel::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    /// How long the surface keeps it visible.
    pub duration: Duration,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Create an info notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    /// Create a success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    /// Create a warning notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    /// Create an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    /// Set a custom duration for this notification.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl From<String> for Notification {
    fn from(message: String) -> Self {
        Notification::info(message)
    }
}

impl From<&str> for Notification {
    fn from(message: &str) -> Self {
        Notification::info(message)
    }
}

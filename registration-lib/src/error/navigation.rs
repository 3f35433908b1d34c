//! View transition error types

use crate::view::ViewId;

/// Why a transition request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Another transition is still inside its animation window.
    InFlight,
    /// The target is already the current view.
    AlreadyCurrent,
    /// The target is not the next view on the forward path.
    NotForward,
    /// A back transition named a view other than the previous history entry.
    NotPrevious,
    /// There is no earlier history entry to return to.
    NoHistory,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::InFlight => "a transition is already in progress",
            Self::AlreadyCurrent => "target is already the current view",
            Self::NotForward => "target is not reachable going forward",
            Self::NotPrevious => "target is not the previous history entry",
            Self::NoHistory => "history has no previous entry",
        };
        f.write_str(text)
    }
}

/// Errors returned by the view state machine.
///
/// A rejected transition leaves the navigation state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The transition was dropped without changing state.
    #[error("Transition to {target} rejected: {reason}")]
    Rejected {
        /// The view that was requested.
        target: ViewId,
        /// Why the request was dropped.
        reason: RejectReason,
    },
}

impl TransitionError {
    /// Creates a new rejection error.
    pub fn rejected(target: ViewId, reason: RejectReason) -> Self {
        Self::Rejected { target, reason }
    }

    /// Returns the reason the transition was dropped.
    pub fn reason(&self) -> RejectReason {
        match self {
            Self::Rejected { reason, .. } => *reason,
        }
    }
}

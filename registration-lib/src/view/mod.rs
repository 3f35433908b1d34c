//! The three registration screens and the state machine moving between them.

mod animation;
mod machine;

pub use animation::{Easing, Fade};
pub use machine::{NavigationState, ViewStateMachine};

use std::fmt;
use std::str::FromStr;

/// One of the registration screens.
///
/// The ordering is the forward navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewId {
    Form,
    Confirmation,
    Complete,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::Form, ViewId::Confirmation, ViewId::Complete];

    /// Token persisted as the navigation hint (the URL fragment in a browser).
    pub fn token(&self) -> &'static str {
        match self {
            Self::Form => "register-form",
            Self::Confirmation => "register-confirmation",
            Self::Complete => "register-complete",
        }
    }

    /// Parses a persisted token, returning `None` for anything unknown.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.strip_prefix('#').unwrap_or(token);
        Self::ALL.into_iter().find(|view| view.token() == token)
    }

    /// The only view reachable from this one going forward.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Form => Some(Self::Confirmation),
            Self::Confirmation => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Element that receives input focus once this view is shown.
    pub fn focus_target(&self) -> FocusTarget {
        match self {
            Self::Form => FocusTarget::NameField,
            Self::Confirmation => FocusTarget::RegisterButton,
            Self::Complete => FocusTarget::HomeButton,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ViewId {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| UnknownView(s.to_string()))
    }
}

/// Error returned when parsing an unknown view token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown view '{0}'")]
pub struct UnknownView(pub String);

/// Focusable element per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    NameField,
    RegisterButton,
    HomeButton,
}

impl FocusTarget {
    /// Element id of the focus target.
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::NameField => "name",
            Self::RegisterButton => "register-btn",
            Self::HomeButton => "home-btn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_and_tolerate_hash() {
        for view in ViewId::ALL {
            assert_eq!(ViewId::from_token(view.token()), Some(view));
        }
        assert_eq!(
            ViewId::from_token("#register-confirmation"),
            Some(ViewId::Confirmation)
        );
        assert_eq!(ViewId::from_token("register-unknown"), None);
        assert!("".parse::<ViewId>().is_err());
    }

    #[test]
    fn forward_order() {
        assert!(ViewId::Form < ViewId::Confirmation);
        assert!(ViewId::Confirmation < ViewId::Complete);
        assert_eq!(ViewId::Form.next(), Some(ViewId::Confirmation));
        assert_eq!(ViewId::Complete.next(), None);
    }

    #[test]
    fn focus_targets() {
        assert_eq!(ViewId::Form.focus_target().element_id(), "name");
        assert_eq!(
            ViewId::Confirmation.focus_target().element_id(),
            "register-btn"
        );
        assert_eq!(ViewId::Complete.focus_target().element_id(), "home-btn");
    }
}

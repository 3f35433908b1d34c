//! View transitions, navigation history and hint persistence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Fade, ViewId};
use crate::collab::{NavigationHintStore, ViewPresenter};
use crate::config::TransitionConfig;
use crate::error::{RejectReason, TransitionError};

/// Where the user is, how they got there, and whether a transition is
/// running.
///
/// Outside a transition window `history` is never empty and its last entry is
/// `current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: ViewId,
    history: Vec<ViewId>,
    transitioning: bool,
    // Bumped by `reset`; a transition started under an older generation does
    // not write its result.
    generation: u64,
}

impl NavigationState {
    fn at(view: ViewId, generation: u64) -> Self {
        Self {
            current: view,
            history: vec![view],
            transitioning: false,
            generation,
        }
    }

    pub fn current(&self) -> ViewId {
        self.current
    }

    pub fn history(&self) -> &[ViewId] {
        &self.history
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::at(ViewId::Form, 0)
    }
}

/// Moves between the registration screens.
///
/// At most one transition runs at a time; requests arriving during one are
/// dropped with [`RejectReason::InFlight`], not queued.
///
/// Going forward only `Form → Confirmation → Complete` is allowed. Going back
/// follows the history stack, so the result depends on the order views were
/// pushed, not on a fixed map.
pub struct ViewStateMachine {
    state: Mutex<NavigationState>,
    presenter: Arc<dyn ViewPresenter>,
    hints: Arc<dyn NavigationHintStore>,
    config: TransitionConfig,
}

impl ViewStateMachine {
    pub fn new(
        presenter: Arc<dyn ViewPresenter>,
        hints: Arc<dyn NavigationHintStore>,
        config: TransitionConfig,
    ) -> Self {
        Self {
            state: Mutex::new(NavigationState::default()),
            presenter,
            hints,
            config,
        }
    }

    fn state(&self) -> MutexGuard<'_, NavigationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn current(&self) -> ViewId {
        self.state().current
    }

    pub fn is_current(&self, view: ViewId) -> bool {
        self.current() == view
    }

    pub fn history(&self) -> Vec<ViewId> {
        self.state().history.clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.state().transitioning
    }

    /// A copy of the full navigation state.
    pub fn snapshot(&self) -> NavigationState {
        self.state().clone()
    }

    /// Restores the view named by the persisted hint, if any.
    ///
    /// This is a silent jump: no animation, no history push. History is
    /// replaced by the restored view alone. Unknown or missing hints leave
    /// the machine on its current view.
    pub fn restore(&self) -> Option<ViewId> {
        let token = self.hints.read()?;
        let Some(view) = ViewId::from_token(&token) else {
            log::debug!("Ignoring unknown navigation hint '{token}'");
            return None;
        };

        {
            let mut state = self.state();
            if state.transitioning {
                return None;
            }
            let generation = state.generation;
            *state = NavigationState::at(view, generation);
        }

        log::debug!("Restored view {view} from navigation hint");
        self.presenter.show(view);
        Some(view)
    }

    /// Animates to `target`.
    ///
    /// Forward transitions push `target` and persist its hint token. A back
    /// transition must name the entry below the top of history; that top
    /// entry is popped and no hint is written.
    pub async fn transit_to(&self, target: ViewId, is_back: bool) -> Result<(), TransitionError> {
        let (from, generation) = {
            let mut state = self.state();
            if state.transitioning {
                return Err(self.reject(target, RejectReason::InFlight));
            }
            if state.current == target {
                return Err(self.reject(target, RejectReason::AlreadyCurrent));
            }
            if is_back {
                let len = state.history.len();
                if len < 2 || state.history[len - 2] != target {
                    return Err(self.reject(target, RejectReason::NotPrevious));
                }
                state.history.pop();
            } else if state.current.next() != Some(target) {
                return Err(self.reject(target, RejectReason::NotForward));
            }
            state.transitioning = true;
            (state.current, state.generation)
        };

        self.run(from, target, is_back, generation).await;
        Ok(())
    }

    /// Returns to the previous view in history.
    pub async fn go_back(&self) -> Result<(), TransitionError> {
        let (from, target, generation) = {
            let mut state = self.state();
            let current = state.current;
            if state.transitioning {
                return Err(self.reject(current, RejectReason::InFlight));
            }
            if state.history.len() <= 1 {
                return Err(self.reject(current, RejectReason::NoHistory));
            }
            state.history.pop();
            let target = *state.history.last().unwrap_or(&ViewId::Form);
            state.transitioning = true;
            (current, target, state.generation)
        };

        self.run(from, target, true, generation).await;
        Ok(())
    }

    /// Browser back button. Resolves exactly like [`go_back`](Self::go_back).
    pub async fn handle_history_pop(&self) -> Result<(), TransitionError> {
        self.go_back().await
    }

    /// Reload semantics: back to a fresh `Form` with a single-entry history.
    ///
    /// Any transition still inside its window is abandoned.
    pub fn reset(&self) {
        {
            let mut state = self.state();
            let generation = state.generation + 1;
            *state = NavigationState::at(ViewId::Form, generation);
        }
        log::debug!("Navigation reset to {}", ViewId::Form);
        self.hints.write(ViewId::Form.token());
        self.presenter.show(ViewId::Form);
        self.presenter.focus(ViewId::Form.focus_target());
    }

    async fn run(&self, from: ViewId, target: ViewId, is_back: bool, generation: u64) {
        log::debug!("View transition: {from} -> {target}");

        let guard = InFlight {
            machine: self,
            from,
            is_back,
            generation,
            finished: false,
        };

        let TransitionConfig { duration, easing } = self.config;
        self.presenter.fade_out(from, Fade::out(duration, easing));
        tokio::time::sleep(duration).await;

        if self.state().generation != generation {
            log::debug!("Transition {from} -> {target} abandoned by reset");
            guard.finish();
            return;
        }

        self.presenter.swap(from, target);
        self.presenter.fade_in(target, Fade::in_(duration, easing));

        {
            let mut state = self.state();
            if !is_back {
                state.history.push(target);
            }
            state.current = target;
            state.transitioning = false;
        }
        guard.finish();

        if !is_back {
            self.hints.write(target.token());
        }
        self.presenter.focus(target.focus_target());
    }

    fn reject(&self, target: ViewId, reason: RejectReason) -> TransitionError {
        log::debug!("Transition to {target} dropped: {reason}");
        TransitionError::rejected(target, reason)
    }
}

impl std::fmt::Debug for ViewStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewStateMachine")
            .field("state", &*self.state())
            .field("config", &self.config)
            .finish()
    }
}

/// Rolls the state back if a transition future is dropped mid-window.
struct InFlight<'a> {
    machine: &'a ViewStateMachine,
    from: ViewId,
    is_back: bool,
    generation: u64,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.machine.state();
        if state.generation != self.generation {
            return;
        }
        if self.is_back {
            state.history.push(self.from);
        }
        state.current = self.from;
        state.transitioning = false;
        log::debug!("Transition from {} cancelled, state rolled back", self.from);
    }
}

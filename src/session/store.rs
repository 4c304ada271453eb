//! Session store: pure state transitions, no timing.
//!
//! ```text
//! Idle ──start──▶ Running ◀──resume── Paused
//!                   │  └────pause──────▶ │
//!                   │ tick (0)           │
//!                   ▼                    │
//!               Completed                │
//!                   │ take_completed     │
//!                   ▼                    │
//! Idle ◀────────────┴────── stop ────────┘
//! ```

use tracing::debug;

use super::{SessionError, SessionKind, SessionState, TimerSession};
use crate::stats::WorkspaceId;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No running session; nothing changed
    Skipped,
    /// Counted down one second
    Counting { remaining_seconds: u32 },
    /// Reached zero; the session is now `Completed`
    Completed,
}

/// Owner of the single session value.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Option<TimerSession>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current session, if any.
    pub fn session(&self) -> Option<&TimerSession> {
        self.session.as_ref()
    }

    /// Returns the lifecycle state; `Idle` when there is no session.
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, |session| session.state)
    }

    /// Returns true if the countdown is running.
    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    /// Starts a session of `kind` bound to `workspace`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyActive`] if a session exists; the
    /// existing session is left untouched.
    pub fn start(
        &mut self,
        kind: SessionKind,
        workspace: WorkspaceId,
    ) -> Result<&TimerSession, SessionError> {
        let state = self.state();
        if state.is_active() {
            return Err(SessionError::AlreadyActive { state });
        }
        let session = TimerSession::new(kind, workspace);
        debug!(id = %session.id, %kind, "session started");
        Ok(self.session.insert(session))
    }

    /// Suspends the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless running.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.transition("pause", SessionState::Running, SessionState::Paused)
    }

    /// Resumes a suspended countdown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless paused.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.transition("resume", SessionState::Paused, SessionState::Running)
    }

    /// Tears the session down and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] when idle.
    pub fn stop(&mut self) -> Result<TimerSession, SessionError> {
        let session = self
            .session
            .take()
            .ok_or_else(|| SessionError::invalid("stop", SessionState::Idle))?;
        debug!(id = %session.id, state = %session.state, "session stopped");
        Ok(session)
    }

    /// Counts down one second.
    ///
    /// Only a running session moves; reaching zero marks it `Completed`.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|session| session.state == SessionState::Running)
        else {
            return TickOutcome::Skipped;
        };

        session.remaining_seconds = session.remaining_seconds.saturating_sub(1);
        if session.remaining_seconds == 0 {
            session.state = SessionState::Completed;
            debug!(id = %session.id, "session reached zero");
            TickOutcome::Completed
        } else {
            TickOutcome::Counting {
                remaining_seconds: session.remaining_seconds,
            }
        }
    }

    /// Removes and returns the session if it is `Completed`.
    pub fn take_completed(&mut self) -> Option<TimerSession> {
        if self.state() == SessionState::Completed {
            self.session.take()
        } else {
            None
        }
    }

    fn transition(
        &mut self,
        action: &'static str,
        from: SessionState,
        to: SessionState,
    ) -> Result<(), SessionError> {
        let state = self.state();
        match self.session.as_mut() {
            Some(session) if state == from => {
                session.state = to;
                debug!(id = %session.id, action, state = %to, "session transition");
                Ok(())
            }
            _ => Err(SessionError::invalid(action, state)),
        }
    }
}

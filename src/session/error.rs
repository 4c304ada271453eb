//! Session command error types.
//!
//! Both errors are recoverable: the dashboard treats them as ignored
//! commands and leaves the current session untouched.

use thiserror::Error;

use super::SessionState;

/// Errors returned by session commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A session is already running or paused.
    #[error("A session is already active ({state})")]
    AlreadyActive { state: SessionState },

    /// The command is not allowed in the current state.
    #[error("Cannot {action} while the session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },
}

impl SessionError {
    pub(crate) fn invalid(action: &'static str, state: SessionState) -> Self {
        Self::InvalidTransition { action, state }
    }

    /// Returns true if the command was rejected because a session exists.
    #[must_use]
    pub fn is_already_active(&self) -> bool {
        matches!(self, Self::AlreadyActive { .. })
    }
}

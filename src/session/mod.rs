//! Timer sessions.
//!
//! This module defines the single-session model:
//! - `SessionKind`: the five fixed-length session presets
//! - `SessionState`: the lifecycle states
//! - `TimerSession`: the active session value
//! - `SessionStore`: pure state transitions over the optional session

mod error;
mod store;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::WorkspaceId;

pub use error::SessionError;
pub use store::{SessionStore, TickOutcome};

// ============================================================================
// SessionKind
// ============================================================================

/// Session presets offered by the timer panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// 25 minute focus
    #[serde(rename = "focus-25")]
    ShortFocus25,
    /// 50 minute deep work
    #[serde(rename = "focus-50")]
    DeepWork50,
    /// Two hour deep work, shown fullscreen
    #[serde(rename = "deep-work-120")]
    DeepWork120,
    /// 5 minute eye rest
    #[serde(rename = "eye-rest-5")]
    EyeRest5,
    /// 10 minute eye rest
    #[serde(rename = "eye-rest-10")]
    EyeRest10,
}

impl SessionKind {
    /// Every preset, in panel order.
    pub const ALL: [SessionKind; 5] = [
        SessionKind::ShortFocus25,
        SessionKind::DeepWork50,
        SessionKind::DeepWork120,
        SessionKind::EyeRest5,
        SessionKind::EyeRest10,
    ];

    /// Returns the fixed length of the session in seconds.
    pub fn total_seconds(&self) -> u32 {
        match self {
            SessionKind::ShortFocus25 => 25 * 60,
            SessionKind::DeepWork50 => 50 * 60,
            SessionKind::DeepWork120 => 120 * 60,
            SessionKind::EyeRest5 => 5 * 60,
            SessionKind::EyeRest10 => 10 * 60,
        }
    }

    /// Returns the stable slug of the preset.
    pub fn slug(&self) -> &'static str {
        match self {
            SessionKind::ShortFocus25 => "focus-25",
            SessionKind::DeepWork50 => "focus-50",
            SessionKind::DeepWork120 => "deep-work-120",
            SessionKind::EyeRest5 => "eye-rest-5",
            SessionKind::EyeRest10 => "eye-rest-10",
        }
    }

    /// Returns a human readable label ("focus 25", "eye rest 5", ...).
    pub fn label(&self) -> String {
        self.slug().replace('-', " ")
    }

    /// Returns true for the eye-rest variants.
    pub fn is_eye_rest(&self) -> bool {
        matches!(self, SessionKind::EyeRest5 | SessionKind::EyeRest10)
    }

    /// Returns true if starting this preset opens the fullscreen deep work view.
    pub fn opens_fullscreen(&self) -> bool {
        matches!(self, SessionKind::DeepWork120)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| format!("unknown session kind: {s}"))
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session exists
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Countdown suspended
    Paused,
    /// Reached zero; consumed by the completion coordinator in the same step
    Completed,
}

impl SessionState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
        }
    }

    /// Returns true if a session exists.
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerSession
// ============================================================================

/// Unique identifier of one session instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    /// Instance identifier, used to credit each session at most once
    pub id: SessionId,
    /// Preset the session was started with
    pub kind: SessionKind,
    /// Seconds left before natural completion
    pub remaining_seconds: u32,
    /// Current lifecycle state
    pub state: SessionState,
    /// Creation time; advisory only, ticks drive the countdown
    pub started_at: DateTime<Utc>,
    /// Workspace the session was started in and will be credited to
    pub workspace: WorkspaceId,
}

impl TimerSession {
    /// Creates a running session of `kind` bound to `workspace`.
    pub fn new(kind: SessionKind, workspace: WorkspaceId) -> Self {
        Self {
            id: SessionId::new(),
            kind,
            remaining_seconds: kind.total_seconds(),
            state: SessionState::Running,
            started_at: Utc::now(),
            workspace,
        }
    }

    /// Returns the full length of the session in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.kind.total_seconds()
    }

    /// Returns the remaining share of the session, from 1.0 down to 0.0.
    pub fn remaining_ratio(&self) -> f64 {
        f64::from(self.remaining_seconds) / f64::from(self.total_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod session_kind_tests {
        use super::*;

        #[test]
        fn test_total_seconds() {
            assert_eq!(SessionKind::ShortFocus25.total_seconds(), 1500);
            assert_eq!(SessionKind::DeepWork50.total_seconds(), 3000);
            assert_eq!(SessionKind::DeepWork120.total_seconds(), 7200);
            assert_eq!(SessionKind::EyeRest5.total_seconds(), 300);
            assert_eq!(SessionKind::EyeRest10.total_seconds(), 600);
        }

        #[test]
        fn test_eye_rest_variants() {
            let eye_rest: Vec<_> = SessionKind::ALL
                .into_iter()
                .filter(SessionKind::is_eye_rest)
                .collect();
            assert_eq!(eye_rest, vec![SessionKind::EyeRest5, SessionKind::EyeRest10]);
        }

        #[test]
        fn test_only_deep_work_120_opens_fullscreen() {
            for kind in SessionKind::ALL {
                assert_eq!(kind.opens_fullscreen(), kind == SessionKind::DeepWork120);
            }
        }

        #[test]
        fn test_slug_round_trips_through_from_str() {
            for kind in SessionKind::ALL {
                assert_eq!(kind.slug().parse::<SessionKind>().unwrap(), kind);
            }
            assert!("focus-30".parse::<SessionKind>().is_err());
        }

        #[test]
        fn test_label() {
            assert_eq!(SessionKind::DeepWork120.label(), "deep work 120");
            assert_eq!(SessionKind::EyeRest5.label(), "eye rest 5");
        }

        #[test]
        fn test_serializes_as_slug() {
            let json = serde_json::to_string(&SessionKind::EyeRest10).unwrap();
            assert_eq!(json, "\"eye-rest-10\"");
        }
    }

    mod session_state_tests {
        use super::*;

        #[test]
        fn test_default_is_idle() {
            assert_eq!(SessionState::default(), SessionState::Idle);
        }

        #[test]
        fn test_is_active() {
            assert!(!SessionState::Idle.is_active());
            assert!(SessionState::Running.is_active());
            assert!(SessionState::Paused.is_active());
            assert!(SessionState::Completed.is_active());
        }
    }

    mod timer_session_tests {
        use super::*;

        #[test]
        fn test_new_session_is_full_and_running() {
            let session = TimerSession::new(SessionKind::DeepWork50, WorkspaceId::default());
            assert_eq!(session.remaining_seconds, 3000);
            assert_eq!(session.state, SessionState::Running);
            assert_eq!(session.workspace.as_str(), "pro");
            assert!((session.remaining_ratio() - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_ids_are_unique() {
            let a = TimerSession::new(SessionKind::EyeRest5, WorkspaceId::default());
            let b = TimerSession::new(SessionKind::EyeRest5, WorkspaceId::default());
            assert_ne!(a.id, b.id);
        }

        #[test]
        fn test_serialize() {
            let session = TimerSession::new(SessionKind::ShortFocus25, WorkspaceId::default());
            let json = serde_json::to_string(&session).unwrap();
            assert!(json.contains("\"kind\":\"focus-25\""));
            assert!(json.contains("\"remainingSeconds\":1500"));
            assert!(json.contains("\"state\":\"running\""));
        }
    }
}

//! Observable data types of the dashboard.
//!
//! This module defines what subscribers see:
//! - `Presentation`: floating widget and deep work view flags
//! - `SessionSnapshot` / `StatsSnapshot`: values published on every change
//! - `SessionEvent`: lifecycle notifications for external integrations

use serde::{Deserialize, Serialize};

use crate::session::{SessionId, SessionKind, SessionState, TimerSession};
use crate::stats::{Stats, StatsDelta, WorkspaceId};

// ============================================================================
// Presentation
// ============================================================================

/// Presentation flags shown while a session is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// The floating timer widget is shown
    pub floating_widget_visible: bool,
    /// The fullscreen deep work view is shown
    pub deep_work_fullscreen: bool,
}

impl Presentation {
    /// Flags set when a session of `kind` starts.
    pub fn for_session(kind: SessionKind) -> Self {
        Self {
            floating_widget_visible: true,
            deep_work_fullscreen: kind.opens_fullscreen(),
        }
    }

    /// Returns true if nothing is shown.
    pub fn is_hidden(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// SessionSnapshot
// ============================================================================

/// Published view of the session.
///
/// A `Completed` session is consumed before the snapshot is published, so
/// subscribers only ever see `Idle`, `Running` or `Paused`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session: Option<TimerSession>,
    pub presentation: Presentation,
}

impl SessionSnapshot {
    /// Returns the lifecycle state.
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, |session| session.state)
    }

    /// Returns the remaining seconds, if a session exists.
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.session.as_ref().map(|session| session.remaining_seconds)
    }

    /// Returns the remaining time as `mm:ss`, if a session exists.
    pub fn remaining_display(&self) -> Option<String> {
        self.remaining_seconds().map(format_remaining)
    }

    /// Returns true if there is no session.
    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }
}

/// Formats seconds as `mm:ss`; minutes are not wrapped into hours.
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ============================================================================
// StatsSnapshot
// ============================================================================

/// Published counters of the active workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub workspace: WorkspaceId,
    pub stats: Stats,
}

// ============================================================================
// SessionEvent
// ============================================================================

/// What ended a session with credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionTrigger {
    /// The countdown reached zero
    NaturalExpiry,
    /// The user stopped the session and asked for it to count
    ManualFinish,
}

/// Session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A session started
    Started {
        id: SessionId,
        kind: SessionKind,
        workspace: WorkspaceId,
    },
    /// The countdown was suspended
    Paused { id: SessionId, remaining_seconds: u32 },
    /// The countdown continued
    Resumed { id: SessionId, remaining_seconds: u32 },
    /// The session was stopped without credit
    Aborted { id: SessionId, remaining_seconds: u32 },
    /// The session was credited
    Completed {
        id: SessionId,
        kind: SessionKind,
        workspace: WorkspaceId,
        trigger: CompletionTrigger,
        delta: StatsDelta,
    },
}

impl SessionEvent {
    /// Returns the id of the session the event belongs to.
    pub fn session_id(&self) -> SessionId {
        match self {
            SessionEvent::Started { id, .. }
            | SessionEvent::Paused { id, .. }
            | SessionEvent::Resumed { id, .. }
            | SessionEvent::Aborted { id, .. }
            | SessionEvent::Completed { id, .. } => *id,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

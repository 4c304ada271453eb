//! Bifocus timer engine library
//!
//! This library provides the timer and accounting core of the Bifocus
//! dashboard. It includes:
//! - A single-session countdown state machine with pause/resume
//! - A cancelable one-second scheduler driving the countdown
//! - Exactly-once completion that credits per-workspace statistics
//! - Fire-and-forget persistence through a key-value gateway
//! - Floating widget position persistence
//! - Completion notifications behind a host seam

pub mod config;
pub mod dashboard;
pub mod logging;
pub mod notification;
pub mod persistence;
pub mod session;
pub mod stats;
pub mod timer;
pub mod types;
pub mod widget;

// Re-export commonly used types for convenience
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::Dashboard;
pub use types::{
    CompletionTrigger, Presentation, SessionEvent, SessionSnapshot, StatsSnapshot,
};

pub use notification::{
    LogNotifier, MockNotifier, NotificationDispatcher, NotificationError, Notifier,
    PermissionState,
};

pub use persistence::{
    FileGateway, MemoryGateway, PersistWriter, PersistenceError, PersistenceGateway,
};

pub use session::{SessionError, SessionKind, SessionState, SessionStore, TimerSession};

pub use stats::{LedgerBook, LedgerError, Stats, StatsDelta, StatsLedger, WorkspaceId};

pub use widget::{Viewport, WidgetPosition, WidgetPositionStore, WidgetSize};

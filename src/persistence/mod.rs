//! Key-value persistence for the dashboard.
//!
//! The storage backend itself belongs to the host application; this module
//! only models its read/write contract:
//!
//! ```text
//! ┌──────────────┐ enqueue  ┌──────────────┐  set   ┌────────────────────┐
//! │ StatsLedger  │─────────▶│ PersistWriter│───────▶│ PersistenceGateway │
//! └──────────────┘          └──────────────┘        │  (Memory / File)   │
//!                                                   └────────────────────┘
//! ```
//!
//! Writes are fire-and-forget and applied in enqueue order by a single
//! writer task, so the last write to a key wins. Failures are logged and
//! never retried; the next mutation naturally writes the up-to-date value.

mod error;
mod file;
mod memory;
mod writer;

use async_trait::async_trait;

use crate::stats::WorkspaceId;

pub use error::PersistenceError;
pub use file::FileGateway;
pub use memory::MemoryGateway;
pub use writer::PersistWriter;

/// Global key for the floating widget position.
pub const WIDGET_POSITION_KEY: &str = "bifocus-timer-position";

/// Returns the key holding the statistics of a workspace.
pub fn stats_key(workspace: &WorkspaceId) -> String {
    format!("stats-{}", workspace)
}

/// Asynchronous string store keyed by string.
///
/// Implementations must be cheap to share; the dashboard holds them behind
/// an `Arc` and calls them from spawned tasks.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

//! Per-workspace session accounting.
//!
//! This module contains:
//! - `Stats`: the three aggregate counters of a workspace
//! - `StatsDelta`: an additive credit
//! - `StatsLedger`: the counters of one workspace plus their persistence
//! - `LedgerBook`: every loaded ledger and the active workspace

mod book;
mod error;
mod workspace;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::persistence::{stats_key, PersistWriter, PersistenceGateway};
use crate::session::SessionKind;

pub use book::LedgerBook;
pub use error::LedgerError;
pub use workspace::{WorkspaceId, DEFAULT_WORKSPACE};

// ============================================================================
// Stats
// ============================================================================

/// Aggregate counters of a workspace.
///
/// The serialized field names match the values already stored by the
/// dashboard front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Minutes credited by completed focus sessions
    #[serde(rename = "focusTime", default)]
    pub focus_minutes: u64,
    /// Completed eye-rest breaks
    #[serde(rename = "breaks", default)]
    pub breaks_count: u64,
    /// Tasks moved to "done"
    #[serde(rename = "tasksCompleted", default)]
    pub tasks_completed: u64,
}

impl Stats {
    /// Returns the counters with `delta` added. Counters saturate instead of
    /// wrapping.
    #[must_use]
    pub fn merged(self, delta: StatsDelta) -> Self {
        Self {
            focus_minutes: self.focus_minutes.saturating_add(delta.focus_minutes),
            breaks_count: self.breaks_count.saturating_add(delta.breaks_count),
            tasks_completed: self.tasks_completed.saturating_add(delta.tasks_completed),
        }
    }
}

// ============================================================================
// StatsDelta
// ============================================================================

/// Additive credit applied to [`Stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDelta {
    pub focus_minutes: u64,
    pub breaks_count: u64,
    pub tasks_completed: u64,
}

impl StatsDelta {
    /// Credit earned by completing a session of `kind`.
    ///
    /// Eye-rest sessions count as one break; focus sessions credit their
    /// full length in minutes.
    #[must_use]
    pub fn for_session(kind: SessionKind) -> Self {
        if kind.is_eye_rest() {
            Self {
                breaks_count: 1,
                ..Self::default()
            }
        } else {
            Self {
                focus_minutes: u64::from(kind.total_seconds() / 60),
                ..Self::default()
            }
        }
    }

    /// Credit for one task moved to "done".
    #[must_use]
    pub fn task_completed() -> Self {
        Self {
            tasks_completed: 1,
            ..Self::default()
        }
    }

    /// Returns true if applying the delta changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// StatsLedger
// ============================================================================

/// Counters of a single workspace.
///
/// Every mutation enqueues a write of the full value; the write is never
/// awaited and failures are only logged.
#[derive(Debug, Clone)]
pub struct StatsLedger {
    workspace: WorkspaceId,
    stats: Stats,
    writer: PersistWriter,
}

impl StatsLedger {
    /// Creates a ledger with the given starting counters.
    pub fn new(workspace: WorkspaceId, stats: Stats, writer: PersistWriter) -> Self {
        Self {
            workspace,
            stats,
            writer,
        }
    }

    /// Loads the persisted counters of `workspace`.
    ///
    /// Missing, unreadable or malformed values start from zero; the error is
    /// logged and the in-memory value becomes authoritative.
    pub async fn load(
        workspace: WorkspaceId,
        gateway: &Arc<dyn PersistenceGateway>,
        writer: PersistWriter,
    ) -> Self {
        let key = stats_key(&workspace);
        let stats = match gateway.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Stats>(&raw) {
                Ok(stats) => stats,
                Err(e) => {
                    warn!(%key, error = %e, "stored stats are malformed, starting from zero");
                    Stats::default()
                }
            },
            Ok(None) => {
                debug!(%key, "no stored stats");
                Stats::default()
            }
            Err(e) => {
                warn!(%key, error = %e, "failed to load stats, starting from zero");
                Stats::default()
            }
        };
        Self::new(workspace, stats, writer)
    }

    /// Returns the workspace this ledger belongs to.
    pub fn workspace(&self) -> &WorkspaceId {
        &self.workspace
    }

    /// Returns the current counters.
    pub fn read(&self) -> Stats {
        self.stats
    }

    /// Adds `delta` to the counters and schedules a write.
    pub fn credit(&mut self, delta: StatsDelta) -> Stats {
        self.stats = self.stats.merged(delta);
        debug!(workspace = %self.workspace, ?delta, stats = ?self.stats, "stats credited");
        self.writer.persist_json(stats_key(&self.workspace), &self.stats);
        self.stats
    }

    /// Credits one completed task.
    pub fn credit_task_completed(&mut self) -> Stats {
        self.credit(StatsDelta::task_completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryGateway;

    mod stats_tests {
        use super::*;

        #[test]
        fn test_default_is_zero() {
            let stats = Stats::default();
            assert_eq!(stats.focus_minutes, 0);
            assert_eq!(stats.breaks_count, 0);
            assert_eq!(stats.tasks_completed, 0);
        }

        #[test]
        fn test_serialized_field_names() {
            let stats = Stats {
                focus_minutes: 75,
                breaks_count: 2,
                tasks_completed: 4,
            };
            let json = serde_json::to_string(&stats).unwrap();
            assert!(json.contains("\"focusTime\":75"));
            assert!(json.contains("\"breaks\":2"));
            assert!(json.contains("\"tasksCompleted\":4"));
        }

        #[test]
        fn test_missing_fields_read_as_zero() {
            let stats: Stats = serde_json::from_str(r#"{"focusTime":50}"#).unwrap();
            assert_eq!(stats.focus_minutes, 50);
            assert_eq!(stats.breaks_count, 0);
            assert_eq!(stats.tasks_completed, 0);
        }

        #[test]
        fn test_merged_saturates() {
            let stats = Stats {
                focus_minutes: u64::MAX,
                ..Stats::default()
            };
            let merged = stats.merged(StatsDelta::for_session(SessionKind::ShortFocus25));
            assert_eq!(merged.focus_minutes, u64::MAX);
        }
    }

    mod delta_tests {
        use super::*;

        #[test]
        fn test_focus_sessions_credit_minutes() {
            assert_eq!(StatsDelta::for_session(SessionKind::ShortFocus25).focus_minutes, 25);
            assert_eq!(StatsDelta::for_session(SessionKind::DeepWork50).focus_minutes, 50);
            assert_eq!(StatsDelta::for_session(SessionKind::DeepWork120).focus_minutes, 120);
            assert_eq!(StatsDelta::for_session(SessionKind::DeepWork120).breaks_count, 0);
        }

        #[test]
        fn test_eye_rest_sessions_credit_one_break() {
            for kind in [SessionKind::EyeRest5, SessionKind::EyeRest10] {
                let delta = StatsDelta::for_session(kind);
                assert_eq!(delta.breaks_count, 1);
                assert_eq!(delta.focus_minutes, 0);
            }
        }

        #[test]
        fn test_task_completed() {
            let delta = StatsDelta::task_completed();
            assert_eq!(delta.tasks_completed, 1);
            assert!(!delta.is_empty());
            assert!(StatsDelta::default().is_empty());
        }
    }

    mod ledger_tests {
        use super::*;

        fn gateway() -> (Arc<MemoryGateway>, Arc<dyn PersistenceGateway>) {
            let memory = Arc::new(MemoryGateway::new());
            let dyn_gateway: Arc<dyn PersistenceGateway> = memory.clone();
            (memory, dyn_gateway)
        }

        #[tokio::test]
        async fn test_load_missing_starts_from_zero() {
            let (_memory, gateway) = gateway();
            let writer = PersistWriter::spawn(gateway.clone());

            let ledger = StatsLedger::load(WorkspaceId::default(), &gateway, writer).await;
            assert_eq!(ledger.read(), Stats::default());
        }

        #[tokio::test]
        async fn test_load_existing_value() {
            let memory = Arc::new(MemoryGateway::with_entries([(
                "stats-perso",
                r#"{"focusTime":100,"tasksCompleted":3,"breaks":2}"#,
            )]));
            let gateway: Arc<dyn PersistenceGateway> = memory;
            let writer = PersistWriter::spawn(gateway.clone());

            let workspace = WorkspaceId::parse("perso").unwrap();
            let ledger = StatsLedger::load(workspace, &gateway, writer).await;
            assert_eq!(
                ledger.read(),
                Stats {
                    focus_minutes: 100,
                    breaks_count: 2,
                    tasks_completed: 3,
                }
            );
        }

        #[tokio::test]
        async fn test_load_malformed_or_failing_starts_from_zero() {
            let memory = Arc::new(MemoryGateway::with_entries([("stats-pro", "not json")]));
            let gateway: Arc<dyn PersistenceGateway> = memory.clone();
            let writer = PersistWriter::spawn(gateway.clone());

            let ledger = StatsLedger::load(WorkspaceId::default(), &gateway, writer.clone()).await;
            assert_eq!(ledger.read(), Stats::default());

            memory.set_fail_reads(true);
            let ledger = StatsLedger::load(WorkspaceId::default(), &gateway, writer).await;
            assert_eq!(ledger.read(), Stats::default());
        }

        #[tokio::test]
        async fn test_credit_persists_full_value() {
            let (memory, gateway) = gateway();
            let writer = PersistWriter::spawn(gateway.clone());
            let mut ledger =
                StatsLedger::new(WorkspaceId::default(), Stats::default(), writer.clone());

            ledger.credit(StatsDelta::for_session(SessionKind::ShortFocus25));
            ledger.credit_task_completed();
            writer.flush().await;

            let stored: Stats =
                serde_json::from_str(&memory.value("stats-pro").unwrap()).unwrap();
            assert_eq!(stored.focus_minutes, 25);
            assert_eq!(stored.tasks_completed, 1);
            assert_eq!(stored, ledger.read());
        }

        #[tokio::test]
        async fn test_failed_write_keeps_memory_authoritative() {
            let (memory, gateway) = gateway();
            let writer = PersistWriter::spawn(gateway.clone());
            let mut ledger =
                StatsLedger::new(WorkspaceId::default(), Stats::default(), writer.clone());

            memory.set_fail_writes(true);
            ledger.credit(StatsDelta::for_session(SessionKind::EyeRest5));
            writer.flush().await;
            assert_eq!(memory.value("stats-pro"), None);
            assert_eq!(ledger.read().breaks_count, 1);

            // The next mutation writes the up-to-date value.
            memory.set_fail_writes(false);
            ledger.credit(StatsDelta::for_session(SessionKind::EyeRest10));
            writer.flush().await;
            let stored: Stats =
                serde_json::from_str(&memory.value("stats-pro").unwrap()).unwrap();
            assert_eq!(stored.breaks_count, 2);
        }
    }
}

//! Loaded ledgers and the active workspace.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{Stats, StatsDelta, StatsLedger, WorkspaceId};
use crate::persistence::PersistWriter;

/// Every ledger loaded during the process lifetime, keyed by workspace.
///
/// Ledgers are never evicted, so a session bound to a workspace that is no
/// longer active can still be credited without reloading.
#[derive(Debug)]
pub struct LedgerBook {
    active: WorkspaceId,
    ledgers: HashMap<WorkspaceId, StatsLedger>,
    writer: PersistWriter,
}

impl LedgerBook {
    /// Creates a book whose active workspace is the one of `initial`.
    pub fn new(initial: StatsLedger, writer: PersistWriter) -> Self {
        let active = initial.workspace().clone();
        let mut ledgers = HashMap::new();
        ledgers.insert(active.clone(), initial);
        Self {
            active,
            ledgers,
            writer,
        }
    }

    /// Returns the active workspace.
    pub fn active(&self) -> &WorkspaceId {
        &self.active
    }

    /// Returns the counters of the active workspace.
    pub fn active_stats(&self) -> Stats {
        self.stats(&self.active)
    }

    /// Returns the counters of `workspace`, zero if it was never loaded.
    pub fn stats(&self, workspace: &WorkspaceId) -> Stats {
        self.ledgers
            .get(workspace)
            .map(StatsLedger::read)
            .unwrap_or_default()
    }

    /// Returns true if the ledger of `workspace` is loaded.
    pub fn contains(&self, workspace: &WorkspaceId) -> bool {
        self.ledgers.contains_key(workspace)
    }

    /// Adds a freshly loaded ledger. An already loaded ledger for the same
    /// workspace wins, since it may hold credits not yet persisted.
    pub fn adopt(&mut self, ledger: StatsLedger) {
        let workspace = ledger.workspace().clone();
        if self.ledgers.contains_key(&workspace) {
            debug!(%workspace, "ledger already loaded, keeping in-memory value");
            return;
        }
        self.ledgers.insert(workspace, ledger);
    }

    /// Makes `workspace` the active one.
    ///
    /// Returns false if its ledger is not loaded.
    pub fn activate(&mut self, workspace: &WorkspaceId) -> bool {
        if !self.ledgers.contains_key(workspace) {
            return false;
        }
        self.active = workspace.clone();
        true
    }

    /// Credits `delta` to the ledger of `workspace`.
    pub fn credit(&mut self, workspace: &WorkspaceId, delta: StatsDelta) -> Stats {
        let writer = &self.writer;
        self.ledgers
            .entry(workspace.clone())
            .or_insert_with(|| {
                // Only reachable if a caller credits a workspace it never loaded.
                warn!(%workspace, "crediting a workspace that was never loaded");
                StatsLedger::new(workspace.clone(), Stats::default(), writer.clone())
            })
            .credit(delta)
    }

    /// Credits one completed task to the active workspace.
    pub fn credit_task_completed(&mut self) -> Stats {
        let active = self.active.clone();
        self.credit(&active, StatsDelta::task_completed())
    }
}

//! Timer engine: the session store, its countdown and its accounting behind
//! one lock.

use std::sync::Weak;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::Duration;
use tracing::{debug, warn};

use super::completion::CompletionCoordinator;
use super::scheduler::{CountdownScheduler, TickFlow};
use crate::notification::NotificationDispatcher;
use crate::session::{SessionError, SessionKind, SessionStore, TickOutcome, TimerSession};
use crate::stats::{LedgerBook, Stats, StatsDelta, StatsLedger, WorkspaceId};
use crate::types::{
    CompletionTrigger, Presentation, SessionEvent, SessionSnapshot, StatsSnapshot,
};

/// Capacity of the lifecycle event channel.
pub const EVENT_CAPACITY: usize = 64;

/// Channels the engine publishes to.
#[derive(Debug, Clone)]
pub struct EngineChannels {
    pub session: watch::Sender<SessionSnapshot>,
    pub stats: watch::Sender<StatsSnapshot>,
    pub events: broadcast::Sender<SessionEvent>,
}

/// Timer engine that owns the session and everything that reacts to it.
///
/// All methods run under the engine mutex. After every command the
/// countdown is re-synchronized: armed while the session is running,
/// cancelled otherwise.
#[derive(Debug)]
pub struct TimerEngine {
    store: SessionStore,
    scheduler: CountdownScheduler,
    coordinator: CompletionCoordinator,
    ledgers: LedgerBook,
    presentation: Presentation,
    channels: EngineChannels,
    this: Weak<Mutex<TimerEngine>>,
}

impl TimerEngine {
    /// Creates an idle engine.
    ///
    /// `this` must point at the mutex the engine is placed in; it is how
    /// scheduled ticks find their way back.
    pub fn new(
        tick_period: Duration,
        ledgers: LedgerBook,
        dispatcher: NotificationDispatcher,
        channels: EngineChannels,
        this: Weak<Mutex<TimerEngine>>,
    ) -> Self {
        let engine = Self {
            store: SessionStore::new(),
            scheduler: CountdownScheduler::new(tick_period),
            coordinator: CompletionCoordinator::new(dispatcher),
            ledgers,
            presentation: Presentation::default(),
            channels,
            this,
        };
        engine.publish_session();
        engine.publish_stats();
        engine
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn session(&self) -> Option<&TimerSession> {
        self.store.session()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.store.session().cloned(),
            presentation: self.presentation,
        }
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            workspace: self.ledgers.active().clone(),
            stats: self.ledgers.active_stats(),
        }
    }

    pub fn stats_of(&self, workspace: &WorkspaceId) -> Stats {
        self.ledgers.stats(workspace)
    }

    pub fn has_ledger(&self, workspace: &WorkspaceId) -> bool {
        self.ledgers.contains(workspace)
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_armed()
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts a session bound to the active workspace.
    pub fn start(&mut self, kind: SessionKind) -> Result<SessionSnapshot, SessionError> {
        let workspace = self.ledgers.active().clone();
        let session = self.store.start(kind, workspace)?;
        let event = SessionEvent::Started {
            id: session.id,
            kind,
            workspace: session.workspace.clone(),
        };

        self.presentation = Presentation::for_session(kind);
        self.coordinator.dispatcher().request_permission_if_undecided();
        self.emit(event);
        self.sync_scheduler();
        Ok(self.publish_session())
    }

    pub fn pause(&mut self) -> Result<SessionSnapshot, SessionError> {
        self.store.pause()?;
        if let Some(session) = self.store.session() {
            self.emit(SessionEvent::Paused {
                id: session.id,
                remaining_seconds: session.remaining_seconds,
            });
        }
        self.sync_scheduler();
        Ok(self.publish_session())
    }

    pub fn resume(&mut self) -> Result<SessionSnapshot, SessionError> {
        self.store.resume()?;
        if let Some(session) = self.store.session() {
            self.emit(SessionEvent::Resumed {
                id: session.id,
                remaining_seconds: session.remaining_seconds,
            });
        }
        self.sync_scheduler();
        Ok(self.publish_session())
    }

    /// Tears the session down. With `completed` the session is credited as
    /// if it had run out, without a notification.
    ///
    /// Returns the credit applied, `None` for an abort.
    pub fn stop(&mut self, completed: bool) -> Result<Option<StatsDelta>, SessionError> {
        let session = self.store.stop()?;
        let delta = if completed {
            self.complete(&session, CompletionTrigger::ManualFinish)
        } else {
            self.emit(SessionEvent::Aborted {
                id: session.id,
                remaining_seconds: session.remaining_seconds,
            });
            None
        };

        self.presentation = Presentation::default();
        self.sync_scheduler();
        self.publish_session();
        Ok(delta)
    }

    /// Leaves the fullscreen deep work view; the session keeps running.
    ///
    /// Returns false if the view was not shown.
    pub fn exit_deep_work(&mut self) -> bool {
        if !self.presentation.deep_work_fullscreen {
            return false;
        }
        self.presentation.deep_work_fullscreen = false;
        self.publish_session();
        true
    }

    /// Credits one completed task to the active workspace.
    pub fn credit_task_completed(&mut self) -> Stats {
        let stats = self.ledgers.credit_task_completed();
        self.publish_stats();
        stats
    }

    /// Makes `workspace` active, adopting `loaded` if it was not loaded yet.
    ///
    /// The running session stays bound to the workspace it started in.
    pub fn switch_workspace(
        &mut self,
        workspace: &WorkspaceId,
        loaded: Option<StatsLedger>,
    ) -> StatsSnapshot {
        if let Some(ledger) = loaded {
            self.ledgers.adopt(ledger);
        }
        if self.ledgers.activate(workspace) {
            debug!(%workspace, "workspace activated");
        } else {
            warn!(%workspace, "workspace ledger missing, keeping active workspace");
        }
        self.publish_stats()
    }

    /// Stops ticking. The session itself is kept.
    pub fn halt(&mut self) {
        self.scheduler.cancel();
    }

    // ------------------------------------------------------------------------
    // Countdown
    // ------------------------------------------------------------------------

    /// Applies one scheduled tick armed with `generation`.
    pub fn on_scheduled_tick(&mut self, generation: u64) -> TickFlow {
        if !self.scheduler.is_current(generation) {
            debug!(generation, "stale tick ignored");
            return TickFlow::Halt;
        }

        match self.store.tick() {
            TickOutcome::Counting { .. } => {
                self.publish_session();
                TickFlow::Continue
            }
            TickOutcome::Completed => {
                self.finish_natural();
                TickFlow::Halt
            }
            TickOutcome::Skipped => {
                self.sync_scheduler();
                TickFlow::Halt
            }
        }
    }

    fn finish_natural(&mut self) {
        if let Some(session) = self.store.take_completed() {
            self.complete(&session, CompletionTrigger::NaturalExpiry);
        }
        self.presentation = Presentation::default();
        self.sync_scheduler();
        self.publish_session();
    }

    fn complete(
        &mut self,
        session: &TimerSession,
        trigger: CompletionTrigger,
    ) -> Option<StatsDelta> {
        let delta = self
            .coordinator
            .complete(session, trigger, &mut self.ledgers)?;
        self.emit(SessionEvent::Completed {
            id: session.id,
            kind: session.kind,
            workspace: session.workspace.clone(),
            trigger,
            delta,
        });
        self.publish_stats();
        Some(delta)
    }

    fn sync_scheduler(&mut self) {
        let running = self.store.is_running();
        if running && !self.scheduler.is_armed() {
            let this = self.this.clone();
            self.scheduler.arm(move |generation| {
                let this = this.clone();
                async move {
                    let Some(engine) = this.upgrade() else {
                        return TickFlow::Halt;
                    };
                    let mut engine = engine.lock().await;
                    engine.on_scheduled_tick(generation)
                }
            });
        } else if !running {
            self.scheduler.cancel();
        }
    }

    // ------------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------------

    fn publish_session(&self) -> SessionSnapshot {
        let snapshot = self.snapshot();
        self.channels.session.send_replace(snapshot.clone());
        snapshot
    }

    fn publish_stats(&self) -> StatsSnapshot {
        let snapshot = self.stats_snapshot();
        self.channels.stats.send_replace(snapshot.clone());
        snapshot
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.channels.events.send(event);
    }
}

//! Dashboard handle: the command surface the UI talks to.
//!
//! Every command locks the shared [`TimerEngine`], applies one transition
//! and publishes the resulting snapshots. Reads go through `watch` channels
//! and never take the lock.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info};

use crate::config::{ConfigError, DashboardConfig};
use crate::notification::{LogNotifier, NotificationDispatcher, Notifier};
use crate::persistence::{FileGateway, PersistWriter, PersistenceGateway};
use crate::session::{SessionError, SessionKind};
use crate::stats::{LedgerBook, Stats, StatsDelta, StatsLedger, WorkspaceId};
use crate::timer::{EngineChannels, TimerEngine, EVENT_CAPACITY};
use crate::types::{SessionEvent, SessionSnapshot, StatsSnapshot};
use crate::widget::WidgetPositionStore;

/// Cloneable handle to one timer engine.
#[derive(Clone)]
pub struct Dashboard {
    engine: Arc<Mutex<TimerEngine>>,
    gateway: Arc<dyn PersistenceGateway>,
    writer: PersistWriter,
    widget: WidgetPositionStore,
    session_rx: watch::Receiver<SessionSnapshot>,
    stats_rx: watch::Receiver<StatsSnapshot>,
    events_tx: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("session", &*self.session_rx.borrow())
            .field("stats", &*self.stats_rx.borrow())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Opens a dashboard backed by files in the configured data directory,
    /// with notifications delivered to the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no data directory
    /// can be determined.
    pub async fn open(config: DashboardConfig) -> Result<Self> {
        config.validate().context("Invalid dashboard configuration")?;
        let data_dir = config
            .resolve_data_dir()
            .context("Failed to resolve the data directory")?;
        info!(data_dir = %data_dir.display(), "opening dashboard");

        let gateway: Arc<dyn PersistenceGateway> = Arc::new(FileGateway::new(data_dir));
        let notifier: Arc<dyn Notifier> =
            Arc::new(LogNotifier::new(config.notifications.enabled));
        let dashboard = Self::with_parts(&config, gateway, notifier).await?;
        Ok(dashboard)
    }

    /// Builds a dashboard on the given persistence backend and notifier.
    ///
    /// Loads the ledger of the default workspace before returning. Must be
    /// called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `config` does not validate.
    pub async fn with_parts(
        config: &DashboardConfig,
        gateway: Arc<dyn PersistenceGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let writer = PersistWriter::spawn(Arc::clone(&gateway));
        let initial =
            StatsLedger::load(config.default_workspace.clone(), &gateway, writer.clone()).await;
        let ledgers = LedgerBook::new(initial, writer.clone());

        let (session_tx, session_rx) = watch::channel(SessionSnapshot::default());
        let (stats_tx, stats_rx) = watch::channel(StatsSnapshot::default());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let channels = EngineChannels {
            session: session_tx,
            stats: stats_tx,
            events: events_tx.clone(),
        };

        let dispatcher = NotificationDispatcher::new(notifier);
        let tick_period = config.tick_interval();
        let engine = Arc::new_cyclic(|this| {
            Mutex::new(TimerEngine::new(
                tick_period,
                ledgers,
                dispatcher,
                channels,
                this.clone(),
            ))
        });

        Ok(Self {
            engine,
            widget: WidgetPositionStore::new(Arc::clone(&gateway), writer.clone(), config.widget),
            gateway,
            writer,
            session_rx,
            stats_rx,
            events_tx,
        })
    }

    // ------------------------------------------------------------------------
    // Session commands
    // ------------------------------------------------------------------------

    /// Starts a session of `kind` in the active workspace.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyActive`] if a session exists.
    pub async fn start(&self, kind: SessionKind) -> Result<SessionSnapshot, SessionError> {
        let result = self.engine.lock().await.start(kind);
        log_rejected("start", &result);
        result
    }

    /// Suspends the countdown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless running.
    pub async fn pause(&self) -> Result<SessionSnapshot, SessionError> {
        let result = self.engine.lock().await.pause();
        log_rejected("pause", &result);
        result
    }

    /// Resumes a paused countdown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless paused.
    pub async fn resume(&self) -> Result<SessionSnapshot, SessionError> {
        let result = self.engine.lock().await.resume();
        log_rejected("resume", &result);
        result
    }

    /// Stops the session; with `completed` it is credited as finished.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] when there is no session.
    pub async fn stop(&self, completed: bool) -> Result<Option<StatsDelta>, SessionError> {
        let result = self.engine.lock().await.stop(completed);
        log_rejected("stop", &result);
        result
    }

    /// Leaves the fullscreen deep work view. Returns false if it was not shown.
    pub async fn exit_deep_work(&self) -> bool {
        self.engine.lock().await.exit_deep_work()
    }

    // ------------------------------------------------------------------------
    // Accounting
    // ------------------------------------------------------------------------

    /// Credits one completed task to the active workspace.
    pub async fn credit_task_completed(&self) -> Stats {
        self.engine.lock().await.credit_task_completed()
    }

    /// Makes `workspace` active, loading its ledger on first use.
    ///
    /// A running session keeps counting and is credited to the workspace it
    /// was started in.
    pub async fn switch_workspace(&self, workspace: WorkspaceId) -> StatsSnapshot {
        let loaded = self.engine.lock().await.has_ledger(&workspace);
        let ledger = if loaded {
            None
        } else {
            debug!(%workspace, "loading workspace ledger");
            Some(StatsLedger::load(workspace.clone(), &self.gateway, self.writer.clone()).await)
        };
        self.engine.lock().await.switch_workspace(&workspace, ledger)
    }

    /// Returns the counters of `workspace`, zero if it was never loaded.
    pub async fn stats_of(&self, workspace: &WorkspaceId) -> Stats {
        self.engine.lock().await.stats_of(workspace)
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Returns the latest session snapshot.
    pub fn session(&self) -> SessionSnapshot {
        self.session_rx.borrow().clone()
    }

    /// Returns the latest counters of the active workspace.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats_rx.borrow().clone()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<SessionSnapshot> {
        self.session_rx.clone()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<StatsSnapshot> {
        self.stats_rx.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Returns the floating widget position store.
    pub fn widget(&self) -> &WidgetPositionStore {
        &self.widget
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Waits until every write enqueued so far has been applied.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Stops the countdown and flushes pending writes.
    ///
    /// The session is kept in memory; pausing and resuming re-arms the
    /// countdown.
    pub async fn shutdown(&self) {
        self.engine.lock().await.halt();
        self.flush().await;
        info!("dashboard shut down");
    }
}

fn log_rejected<T>(action: &str, result: &Result<T, SessionError>) {
    if let Err(e) = result {
        debug!(action, error = %e, "command rejected");
    }
}

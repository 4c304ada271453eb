//! Exactly-once session completion.

use tracing::{debug, info};

use crate::notification::{create_completion_content, NotificationDispatcher};
use crate::session::{SessionId, TimerSession};
use crate::stats::{LedgerBook, StatsDelta};
use crate::types::CompletionTrigger;

/// Runs the completion chain of a consumed session.
#[derive(Debug)]
pub struct CompletionCoordinator {
    last_credited: Option<SessionId>,
    dispatcher: NotificationDispatcher,
}

impl CompletionCoordinator {
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self {
            last_credited: None,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Completes `session`, which the caller has already removed from the
    /// store.
    ///
    /// On natural expiry a notification is dispatched first. The session is
    /// then credited to the workspace it was started in and the ledger write
    /// is enqueued. A session that was already credited yields `None`.
    pub fn complete(
        &mut self,
        session: &TimerSession,
        trigger: CompletionTrigger,
        ledgers: &mut LedgerBook,
    ) -> Option<StatsDelta> {
        if self.last_credited == Some(session.id) {
            debug!(id = %session.id, ?trigger, "session already credited");
            return None;
        }

        if trigger == CompletionTrigger::NaturalExpiry {
            self.dispatcher
                .dispatch(create_completion_content(session.kind));
        }

        let delta = StatsDelta::for_session(session.kind);
        let stats = ledgers.credit(&session.workspace, delta);
        self.last_credited = Some(session.id);

        info!(
            id = %session.id,
            kind = %session.kind,
            workspace = %session.workspace,
            ?trigger,
            ?stats,
            "session completed"
        );
        Some(delta)
    }
}

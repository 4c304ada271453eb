//! Fire-and-forget write queue.
//!
//! A single background task drains the queue and applies each write to the
//! gateway in the order it was enqueued. Callers never wait for a write to
//! land; `flush` exists for shutdown and tests.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::PersistenceGateway;

/// Commands accepted by the writer task.
enum WriteCommand {
    Set { key: String, value: String },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PersistWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl std::fmt::Debug for WriteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set { key, .. } => f.debug_struct("Set").field("key", key).finish(),
            Self::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl PersistWriter {
    /// Spawns the writer task on the current tokio runtime.
    ///
    /// The task stops once every handle has been dropped and the queue is
    /// drained.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(gateway: Arc<dyn PersistenceGateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(gateway, rx));
        Self { tx }
    }

    /// Enqueues a write of `value` under `key`.
    pub fn persist(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if self
            .tx
            .send(WriteCommand::Set {
                key: key.clone(),
                value: value.into(),
            })
            .is_err()
        {
            warn!(%key, "persistence writer is gone, write dropped");
        }
    }

    /// Serializes `value` as JSON and enqueues it under `key`.
    pub fn persist_json<T: Serialize>(&self, key: impl Into<String>, value: &T) {
        let key = key.into();
        match serde_json::to_string(value) {
            Ok(json) => self.persist(key, json),
            Err(e) => warn!(%key, error = %e, "failed to serialize value, write dropped"),
        }
    }

    /// Waits until every write enqueued before this call has been applied
    /// (or has failed).
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriteCommand::Flush(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }
}

async fn run_writer(
    gateway: Arc<dyn PersistenceGateway>,
    mut rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            WriteCommand::Set { key, value } => {
                if let Err(e) = gateway.set(&key, &value).await {
                    // No retry: the next mutation rewrites the full value.
                    warn!(%key, error = %e, "persistence write failed, in-memory state kept");
                }
            }
            WriteCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("persistence writer stopped");
}

//! Statistics ledger error types.

use thiserror::Error;

/// Errors raised while addressing a workspace ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The workspace identifier cannot be used as part of a storage key.
    #[error("Invalid workspace identifier: {0:?}")]
    InvalidWorkspace(String),
}

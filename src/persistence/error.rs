//! Persistence error types.
//!
//! Every persistence failure is recoverable: the caller logs it and keeps
//! the in-memory value authoritative.

use thiserror::Error;

/// Errors reported by a [`PersistenceGateway`](super::PersistenceGateway).
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading a value failed.
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Writing a value failed.
    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// The key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend is not reachable at all.
    #[error("Persistence backend is unavailable")]
    Unavailable,
}

impl PersistenceError {
    /// Returns true if the failure happened while reading.
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::ReadFailed { .. })
    }

    /// Returns the key involved, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::ReadFailed { key, .. } | Self::WriteFailed { key, .. } => Some(key),
            Self::InvalidKey(key) => Some(key),
            Self::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PersistenceError::WriteFailed {
            key: "stats-pro".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to write 'stats-pro': disk full");

        let err = PersistenceError::Unavailable;
        assert_eq!(err.to_string(), "Persistence backend is unavailable");
    }

    #[test]
    fn test_key_and_kind() {
        let err = PersistenceError::ReadFailed {
            key: "k".to_string(),
            message: "m".to_string(),
        };
        assert!(err.is_read_error());
        assert_eq!(err.key(), Some("k"));
        assert_eq!(PersistenceError::Unavailable.key(), None);
        assert!(!PersistenceError::InvalidKey("x".into()).is_read_error());
    }
}

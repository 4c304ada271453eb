//! Notification error types.
//!
//! None of these ever reach the user: the dispatcher logs them and the
//! session continues.

use thiserror::Error;

/// Errors that can occur while dispatching a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The user denied notification permission.
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The host environment has no notification facility.
    #[error("Notifications are not available in this environment")]
    NotAvailable,

    /// The host accepted the request but failed to deliver it.
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::SendFailed("timeout".to_string());
        assert!(err.to_string().contains("timeout"));
        assert_eq!(
            NotificationError::PermissionDenied.to_string(),
            "Notification permission denied"
        );
    }

    #[test]
    fn test_is_permission_error() {
        assert!(NotificationError::PermissionDenied.is_permission_error());
        assert!(!NotificationError::NotAvailable.is_permission_error());
        assert!(!NotificationError::SendFailed("x".into()).is_permission_error());
    }
}

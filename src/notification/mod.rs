//! User notifications.
//!
//! The hosting environment owns the real notification facility; this module
//! models its dispatch contract:
//!
//! - [`Notifier`]: the host seam (permission state, permission request, notify)
//! - [`NotificationDispatcher`]: fire-and-forget dispatch that silently skips
//!   when permission has not been granted
//! - [`LogNotifier`]: a host that delivers notifications to the log
//! - [`MockNotifier`]: a recording host for tests
//!
//! Dispatch never blocks the timer and never surfaces an error to the user.

mod content;
pub mod error;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

pub use self::content::{create_completion_content, NotificationContent, COMPLETION_TITLE};
pub use self::error::NotificationError;

// ============================================================================
// Notifier
// ============================================================================

/// Notification permission as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionState {
    /// The user has not been asked yet
    #[default]
    Undecided,
    Granted,
    Denied,
}

/// Host notification facility.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the current permission state.
    fn permission(&self) -> PermissionState;

    /// Asks the user for permission. Must be idempotent.
    async fn request_permission(&self) -> PermissionState;

    /// Shows a notification.
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotificationError>;
}

// ============================================================================
// NotificationDispatcher
// ============================================================================

/// Fire-and-forget front of a [`Notifier`].
///
/// Both operations spawn onto the current tokio runtime and return
/// immediately.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("permission", &self.notifier.permission())
            .finish()
    }
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Requests permission in the background if the user was never asked.
    pub fn request_permission_if_undecided(&self) {
        if self.notifier.permission() != PermissionState::Undecided {
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let state = notifier.request_permission().await;
            debug!(?state, "notification permission requested");
        });
    }

    /// Sends `content` in the background; skipped unless permission is granted.
    pub fn dispatch(&self, content: NotificationContent) {
        let permission = self.notifier.permission();
        if permission != PermissionState::Granted {
            debug!(?permission, title = %content.title, "notification skipped");
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&content.title, &content.body).await {
                debug!(error = %e, "notification not delivered");
            }
        });
    }
}

// ============================================================================
// LogNotifier
// ============================================================================

/// Host without a desktop notification center: notifications go to the log.
#[derive(Debug)]
pub struct LogNotifier {
    granted: bool,
}

impl LogNotifier {
    /// Creates a notifier whose permission is fixed by configuration.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { granted: enabled }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn permission(&self) -> PermissionState {
        if self.granted {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        }
    }

    async fn request_permission(&self) -> PermissionState {
        self.permission()
    }

    async fn notify(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        if !self.granted {
            return Err(NotificationError::PermissionDenied);
        }
        info!(title, body, "notification");
        Ok(())
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Recording notifier for tests.
#[derive(Debug)]
pub struct MockNotifier {
    permission: Mutex<PermissionState>,
    answer: Mutex<PermissionState>,
    permission_requests: AtomicUsize,
    notifications: Mutex<Vec<NotificationContent>>,
    should_fail: AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new(PermissionState::Granted)
    }
}

impl MockNotifier {
    /// Creates a mock reporting `permission`. A permission request answers
    /// `Granted` unless [`set_answer`](Self::set_answer) says otherwise.
    #[must_use]
    pub fn new(permission: PermissionState) -> Self {
        Self {
            permission: Mutex::new(permission),
            answer: Mutex::new(PermissionState::Granted),
            permission_requests: AtomicUsize::new(0),
            notifications: Mutex::new(Vec::new()),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_permission(&self, permission: PermissionState) {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner()) = permission;
    }

    pub fn set_answer(&self, answer: PermissionState) {
        *self.answer.lock().unwrap_or_else(|e| e.into_inner()) = answer;
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn permission_request_count(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<NotificationContent> {
        self.notifications.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn permission(&self) -> PermissionState {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn request_permission(&self) -> PermissionState {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        let mut permission = self.permission.lock().unwrap_or_else(|e| e.into_inner());
        if *permission == PermissionState::Undecided {
            *permission = *self.answer.lock().unwrap_or_else(|e| e.into_inner());
        }
        *permission
    }

    async fn notify(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.notifications
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NotificationContent::new(title, body));
        Ok(())
    }
}

//! Notification content construction.

use crate::session::SessionKind;

/// Title of every session-complete notification.
pub const COMPLETION_TITLE: &str = "Bifocus - Timer finished!";

/// Title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Content announcing the natural completion of a `kind` session.
pub fn create_completion_content(kind: SessionKind) -> NotificationContent {
    NotificationContent::new(COMPLETION_TITLE, format!("{} finished", kind.label()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_content() {
        let content = create_completion_content(SessionKind::EyeRest10);
        assert_eq!(content.title, "Bifocus - Timer finished!");
        assert_eq!(content.body, "eye rest 10 finished");

        let content = create_completion_content(SessionKind::DeepWork120);
        assert_eq!(content.body, "deep work 120 finished");
    }
}

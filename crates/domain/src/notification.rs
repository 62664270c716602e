//! Notification — a persistent, user-visible message about an export or import.
//!
//! Notifications are keyed by `notification_id`: creating one with an id that
//! already exists replaces the previous message.

use serde::{Deserialize, Serialize};

/// A persistent notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    pub title: String,
    /// Markdown body.
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn new(
        notification_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            notification_id: notification_id.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}

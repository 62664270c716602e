//! Notifier port — persistent user-facing notifications.

use std::future::Future;
use std::sync::Arc;

use hasnap_domain::error::SnapshotError;
use hasnap_domain::notification::Notification;

/// Stores notifications until the user dismisses them.
pub trait Notifier {
    /// Create a notification, replacing any with the same id.
    fn create(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), SnapshotError>> + Send;

    /// Dismiss a notification; dismissing an unknown id is not an error.
    fn dismiss(&self, notification_id: &str)
    -> impl Future<Output = Result<(), SnapshotError>> + Send;

    /// List the notifications that have not been dismissed.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Notification>, SnapshotError>> + Send;
}

impl<T: Notifier + Send + Sync> Notifier for Arc<T> {
    fn create(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), SnapshotError>> + Send {
        (**self).create(notification)
    }

    fn dismiss(
        &self,
        notification_id: &str,
    ) -> impl Future<Output = Result<(), SnapshotError>> + Send {
        (**self).dismiss(notification_id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Notification>, SnapshotError>> + Send {
        (**self).get_all()
    }
}

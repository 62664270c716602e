//! `SQLite` implementation of the [`Notifier`] port.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hasnap_app::ports::Notifier;
use hasnap_domain::error::SnapshotError;
use hasnap_domain::notification::Notification;

use crate::error::StorageError;

struct Wrapper(Notification);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Notification {
            notification_id: row.try_get("notification_id")?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
        }))
    }
}

// REPLACE deletes the previous row, so a replaced notification moves last.
const UPSERT: &str =
    "INSERT OR REPLACE INTO notifications (notification_id, title, message) VALUES (?, ?, ?)";
const SELECT_ALL: &str = "SELECT * FROM notifications ORDER BY rowid";
const DELETE_BY_ID: &str = "DELETE FROM notifications WHERE notification_id = ?";

/// Persistent notifications kept until dismissed.
#[derive(Clone)]
pub struct SqliteNotificationStore {
    pool: SqlitePool,
}

impl SqliteNotificationStore {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Notifier for SqliteNotificationStore {
    async fn create(&self, notification: Notification) -> Result<(), SnapshotError> {
        sqlx::query(UPSERT)
            .bind(&notification.notification_id)
            .bind(&notification.title)
            .bind(&notification.message)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        tracing::debug!(notification_id = %notification.notification_id, "notification stored");
        Ok(())
    }

    async fn dismiss(&self, notification_id: &str) -> Result<(), SnapshotError> {
        sqlx::query(DELETE_BY_ID)
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Notification>, SnapshotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

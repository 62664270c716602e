//! `SQLite` implementation of [`ConfigEntryRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteExecutor, SqlitePool};

use hasnap_app::ports::ConfigEntryRepository;
use hasnap_domain::config_entry::{ConfigEntry, ConfigEntryState};
use hasnap_domain::error::SnapshotError;
use hasnap_domain::id::ConfigEntryId;

use crate::error::{StorageError, decode};

struct Wrapper(ConfigEntry);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let state: String = row.try_get("state")?;

        Ok(Self(ConfigEntry {
            id: ConfigEntryId::new(id),
            domain: row.try_get("domain")?,
            title: row.try_get("title")?,
            source: row.try_get("source")?,
            state: ConfigEntryState::from_str(&state).map_err(decode)?,
        }))
    }
}

const INSERT: &str =
    "INSERT INTO config_entries (id, domain, title, source, state) VALUES (?, ?, ?, ?, ?)";
const SELECT_ALL: &str = "SELECT * FROM config_entries ORDER BY rowid";

/// `SQLite`-backed config entry registry.
#[derive(Clone)]
pub struct SqliteConfigEntryRepository {
    pool: SqlitePool,
}

impl SqliteConfigEntryRepository {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a config entry.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Storage`] when the insert fails.
    pub async fn create(&self, entry: ConfigEntry) -> Result<ConfigEntry, SnapshotError> {
        insert(&self.pool, &entry).await?;
        Ok(entry)
    }
}

pub(crate) async fn insert<'e, E>(executor: E, entry: &ConfigEntry) -> Result<(), SnapshotError>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(INSERT)
        .bind(entry.id.as_str())
        .bind(&entry.domain)
        .bind(&entry.title)
        .bind(&entry.source)
        .bind(entry.state.as_str())
        .execute(executor)
        .await
        .map_err(StorageError::from)?;
    Ok(())
}

impl ConfigEntryRepository for SqliteConfigEntryRepository {
    async fn get_all(&self) -> Result<Vec<ConfigEntry>, SnapshotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

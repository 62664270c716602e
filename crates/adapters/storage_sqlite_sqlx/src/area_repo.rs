//! `SQLite` implementation of [`AreaRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteExecutor, SqlitePool};

use hasnap_app::ports::AreaRepository;
use hasnap_domain::area::Area;
use hasnap_domain::error::SnapshotError;
use hasnap_domain::id::AreaId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Area`].
struct Wrapper(Area);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let picture: Option<String> = row.try_get("picture")?;

        Ok(Self(Area {
            id: AreaId::new(id),
            name,
            picture,
        }))
    }
}

const INSERT: &str = "INSERT INTO areas (id, name, picture) VALUES (?, ?, ?)";
const SELECT_ALL: &str = "SELECT * FROM areas ORDER BY rowid";

/// `SQLite`-backed area registry.
#[derive(Clone)]
pub struct SqliteAreaRepository {
    pool: SqlitePool,
}

impl SqliteAreaRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register an area.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] for an invalid area and
    /// [`SnapshotError::Storage`] when the insert fails.
    pub async fn create(&self, area: Area) -> Result<Area, SnapshotError> {
        insert(&self.pool, &area).await?;
        Ok(area)
    }
}

/// Insert one area through any executor, a pool or an open transaction.
pub(crate) async fn insert<'e, E>(executor: E, area: &Area) -> Result<(), SnapshotError>
where
    E: SqliteExecutor<'e>,
{
    area.validate()?;
    sqlx::query(INSERT)
        .bind(area.id.as_str())
        .bind(&area.name)
        .bind(area.picture.as_deref())
        .execute(executor)
        .await
        .map_err(StorageError::from)?;
    Ok(())
}

impl AreaRepository for SqliteAreaRepository {
    async fn get_all(&self) -> Result<Vec<Area>, SnapshotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

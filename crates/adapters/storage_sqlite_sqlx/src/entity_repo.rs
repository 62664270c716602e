//! `SQLite` implementation of [`EntityRepository`].
//!
//! Entities are indexed by owning device, so this registry serves the
//! device lookup directly.

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteExecutor, SqlitePool};

use hasnap_app::ports::EntityRepository;
use hasnap_domain::entity::{DisabledBy, Entity, EntityOptions, EntityUpdate};
use hasnap_domain::error::{NotFoundError, SnapshotError};
use hasnap_domain::id::{AreaId, DeviceId, EntityId};

use crate::error::{StorageError, decode};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Entity);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Entity> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let entity_id: String = row.try_get("entity_id")?;
        let device_id: Option<String> = row.try_get("device_id")?;
        let area_id: Option<String> = row.try_get("area_id")?;
        let disabled_by: Option<String> = row.try_get("disabled_by")?;
        let options: String = row.try_get("options")?;

        let disabled_by = disabled_by
            .map(|value| DisabledBy::from_str(&value))
            .transpose()
            .map_err(decode)?;
        let options: EntityOptions = serde_json::from_str(&options).map_err(decode)?;

        Ok(Self(Entity {
            entity_id: EntityId::new(entity_id),
            unique_id: row.try_get("unique_id")?,
            name: row.try_get("name")?,
            device_id: device_id.map(DeviceId::new),
            area_id: area_id.map(AreaId::new),
            device_class: row.try_get("device_class")?,
            unit_of_measurement: row.try_get("unit_of_measurement")?,
            icon: row.try_get("icon")?,
            platform: row.try_get("platform")?,
            disabled_by,
            options,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO entities (entity_id, unique_id, name, device_id, area_id, device_class,
        unit_of_measurement, icon, platform, disabled_by, options)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_ALL: &str = "SELECT * FROM entities ORDER BY rowid";
const SELECT_BY_ENTITY_ID: &str = "SELECT * FROM entities WHERE entity_id = ?";
const SELECT_BY_DEVICE: &str = "SELECT * FROM entities WHERE device_id = ? ORDER BY rowid";
const SELECT_ENABLED_BY_DEVICE: &str =
    "SELECT * FROM entities WHERE device_id = ? AND disabled_by IS NULL ORDER BY rowid";

// Absent fields keep their stored value.
const UPDATE: &str = r"
    UPDATE entities
    SET name = COALESCE(?, name), options = COALESCE(?, options)
    WHERE entity_id = ?
";

/// `SQLite`-backed entity registry.
#[derive(Clone)]
pub struct SqliteEntityRepository {
    pool: SqlitePool,
}

impl SqliteEntityRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register an entity.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] for an invalid entity and
    /// [`SnapshotError::Storage`] when the insert fails.
    pub async fn create(&self, entity: Entity) -> Result<Entity, SnapshotError> {
        insert(&self.pool, &entity).await?;
        Ok(entity)
    }

    async fn fetch_one(&self, entity_id: &EntityId) -> Result<Option<Entity>, StorageError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ENTITY_ID)
            .bind(entity_id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(Wrapper::maybe(row))
    }
}

pub(crate) async fn insert<'e, E>(executor: E, entity: &Entity) -> Result<(), SnapshotError>
where
    E: SqliteExecutor<'e>,
{
    entity.validate()?;
    let options = serde_json::to_string(&entity.options).map_err(StorageError::from)?;

    sqlx::query(INSERT)
        .bind(entity.entity_id.as_str())
        .bind(&entity.unique_id)
        .bind(entity.name.as_deref())
        .bind(entity.device_id.as_ref().map(DeviceId::as_str))
        .bind(entity.area_id.as_ref().map(AreaId::as_str))
        .bind(entity.device_class.as_deref())
        .bind(entity.unit_of_measurement.as_deref())
        .bind(entity.icon.as_deref())
        .bind(&entity.platform)
        .bind(entity.disabled_by.map(DisabledBy::as_str))
        .bind(&options)
        .execute(executor)
        .await
        .map_err(StorageError::from)?;
    Ok(())
}

impl EntityRepository for SqliteEntityRepository {
    async fn get_all(&self) -> Result<Vec<Entity>, SnapshotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_entity_id(&self, entity_id: &EntityId) -> Result<Option<Entity>, SnapshotError> {
        Ok(self.fetch_one(entity_id).await?)
    }

    async fn update(
        &self,
        entity_id: &EntityId,
        update: EntityUpdate,
    ) -> Result<Entity, SnapshotError> {
        let options = update
            .options
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(StorageError::from)?;

        let result = sqlx::query(UPDATE)
            .bind(update.name.as_deref())
            .bind(options.as_deref())
            .bind(entity_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            }
            .into());
        }

        self.fetch_one(entity_id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            }
            .into()
        })
    }

    fn supports_device_lookup(&self) -> bool {
        true
    }

    async fn find_by_device_id(
        &self,
        device_id: &DeviceId,
        include_disabled: bool,
    ) -> Result<Vec<Entity>, SnapshotError> {
        let query = if include_disabled {
            SELECT_BY_DEVICE
        } else {
            SELECT_ENABLED_BY_DEVICE
        };
        let rows: Vec<Wrapper> = sqlx::query_as(query)
            .bind(device_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

//! `SQLite` implementation of [`DeviceRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteExecutor, SqlitePool};

use hasnap_app::ports::DeviceRepository;
use hasnap_domain::device::Device;
use hasnap_domain::error::SnapshotError;
use hasnap_domain::id::{AreaId, ConfigEntryId, DeviceId};

use crate::error::{StorageError, decode};

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let area_id: Option<String> = row.try_get("area_id")?;
        let config_entries: String = row.try_get("config_entries")?;
        let config_entries: Vec<ConfigEntryId> =
            serde_json::from_str(&config_entries).map_err(decode)?;

        Ok(Self(Device {
            id: DeviceId::new(id),
            name: row.try_get("name")?,
            manufacturer: row.try_get("manufacturer")?,
            model: row.try_get("model")?,
            sw_version: row.try_get("sw_version")?,
            hw_version: row.try_get("hw_version")?,
            area_id: area_id.map(AreaId::new),
            config_entries,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (id, name, manufacturer, model, sw_version, hw_version, area_id, config_entries)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";
const SELECT_ALL: &str = "SELECT * FROM devices ORDER BY rowid";

/// `SQLite`-backed device registry.
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a device.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] for an invalid device and
    /// [`SnapshotError::Storage`] when the insert fails.
    pub async fn create(&self, device: Device) -> Result<Device, SnapshotError> {
        insert(&self.pool, &device).await?;
        Ok(device)
    }
}

pub(crate) async fn insert<'e, E>(executor: E, device: &Device) -> Result<(), SnapshotError>
where
    E: SqliteExecutor<'e>,
{
    device.validate()?;
    let config_entries =
        serde_json::to_string(&device.config_entries).map_err(StorageError::from)?;

    sqlx::query(INSERT)
        .bind(device.id.as_str())
        .bind(device.name.as_deref())
        .bind(device.manufacturer.as_deref())
        .bind(device.model.as_deref())
        .bind(device.sw_version.as_deref())
        .bind(device.hw_version.as_deref())
        .bind(device.area_id.as_ref().map(AreaId::as_str))
        .bind(&config_entries)
        .execute(executor)
        .await
        .map_err(StorageError::from)?;
    Ok(())
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn get_all(&self) -> Result<Vec<Device>, SnapshotError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

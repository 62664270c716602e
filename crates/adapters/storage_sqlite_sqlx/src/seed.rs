//! Registry seed — loads a JSON description of the registries into an empty
//! database.
//!
//! ```json
//! {
//!   "areas": [{"id": "kitchen", "name": "Kitchen", "picture": null}],
//!   "config_entries": [],
//!   "devices": [{"id": "d1", "name": "Bulb", "manufacturer": "Acme", "area_id": "kitchen"}],
//!   "entities": [{"entity_id": "light.kitchen", "unique_id": "l1", "platform": "hue", "device_id": "d1"}]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use hasnap_domain::area::Area;
use hasnap_domain::config_entry::ConfigEntry;
use hasnap_domain::device::Device;
use hasnap_domain::entity::Entity;
use hasnap_domain::error::SnapshotError;

use crate::error::StorageError;
use crate::pool::Database;
use crate::{area_repo, config_entry_repo, device_repo, entity_repo};

const COUNT_DEVICES: &str = "SELECT COUNT(*) FROM devices";

/// Registry contents, in registry order.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrySeed {
    pub areas: Vec<Area>,
    pub config_entries: Vec<ConfigEntry>,
    pub devices: Vec<Device>,
    pub entities: Vec<Entity>,
}

impl RegistrySeed {
    /// Parse a seed document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Json`] when the text is not a valid seed.
    pub fn parse(text: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Seed`] when the file cannot be read and
    /// [`StorageError::Json`] when it is not a valid seed.
    pub fn from_file(path: &Path) -> Result<Self, StorageError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

impl Database {
    /// Load `seed` unless the device registry already holds rows.
    ///
    /// Returns whether the seed was applied.
    ///
    /// # Errors
    ///
    /// Returns the first insert failure. The seed is applied in one
    /// transaction, so a failed seed leaves the registry empty.
    pub async fn seed(&self, seed: RegistrySeed) -> Result<bool, SnapshotError> {
        let (devices,): (i64,) = sqlx::query_as(COUNT_DEVICES)
            .fetch_one(self.pool())
            .await
            .map_err(StorageError::from)?;
        if devices > 0 {
            tracing::info!(devices, "registry already populated, seed ignored");
            return Ok(false);
        }

        let counts = (
            seed.areas.len(),
            seed.config_entries.len(),
            seed.devices.len(),
            seed.entities.len(),
        );
        let mut tx = self.pool().begin().await.map_err(StorageError::from)?;
        for area in seed.areas {
            area_repo::insert(&mut *tx, &area).await?;
        }
        for entry in seed.config_entries {
            config_entry_repo::insert(&mut *tx, &entry).await?;
        }
        for device in seed.devices {
            device_repo::insert(&mut *tx, &device).await?;
        }
        for entity in seed.entities {
            entity_repo::insert(&mut *tx, &entity).await?;
        }
        tx.commit().await.map_err(StorageError::from)?;

        tracing::info!(
            areas = counts.0,
            config_entries = counts.1,
            devices = counts.2,
            entities = counts.3,
            "registry seeded"
        );
        Ok(true)
    }
}

//! Snapshot document — the portable floors → areas → devices → entities tree.
//!
//! A document is built fresh on every export and holds no reference back into
//! the live registries. The read side used by imports lives in [`import`].

pub mod import;

use serde::{Deserialize, Serialize};

use crate::config_entry::ConfigEntry;
use crate::device::Device;
use crate::entity::Entity;
use crate::id::DeviceId;

/// Value written to [`ExportMetadata::generated_by`].
pub const GENERATED_BY: &str = "ha_snapshot";

/// Identifier of the synthetic floor every export contains.
pub const DEFAULT_FLOOR_ID: &str = "default_floor";
/// Display name of the synthetic floor.
pub const DEFAULT_FLOOR_NAME: &str = "Default Floor";

/// Identifier of the synthetic area holding devices without a known area.
pub const UNASSIGNED_AREA_ID: &str = "unassigned";
/// Display name of the synthetic unassigned area.
pub const UNASSIGNED_AREA_NAME: &str = "Unassigned";

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// A complete export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub export_metadata: ExportMetadata,
    pub floors: Vec<Floor>,
    /// Config entries owning the exported devices; only present when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrations: Option<Vec<IntegrationBlock>>,
}

impl SnapshotDocument {
    /// Iterate over every device block, in document order.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceBlock> {
        self.floors
            .iter()
            .flat_map(|floor| floor.areas.iter())
            .flat_map(|area| area.devices.iter())
    }

    /// Iterate over every entity block, in document order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityBlock> {
        self.devices().flat_map(|device| device.entities.iter())
    }

    /// Serialize to JSON; compact unless `pretty` is set.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; with the types in this module this
    /// only happens on writer failures, which a `String` target never has.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Options in effect when the document was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub generated_by: String,
    pub skip_nameless_devices: bool,
    pub include_disabled_entities: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub floors_from_area_names: bool,
}

/// A grouping of areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub floor_id: String,
    pub name: String,
    pub areas: Vec<AreaBlock>,
}

impl Floor {
    /// The synthetic floor holding every area by default.
    #[must_use]
    pub fn default_floor(areas: Vec<AreaBlock>) -> Self {
        Self {
            floor_id: DEFAULT_FLOOR_ID.to_string(),
            name: DEFAULT_FLOOR_NAME.to_string(),
            areas,
        }
    }
}

/// One area and the devices placed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaBlock {
    pub area_id: String,
    pub name: String,
    pub devices: Vec<DeviceBlock>,
}

impl AreaBlock {
    #[must_use]
    pub fn new(area_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            area_id: area_id.into(),
            name: name.into(),
            devices: Vec::new(),
        }
    }

    /// The synthetic block for devices without a known area.
    #[must_use]
    pub fn unassigned() -> Self {
        Self::new(UNASSIGNED_AREA_ID, UNASSIGNED_AREA_NAME)
    }
}

/// Projection of a device and its included entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBlock {
    pub device_id: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub entities: Vec<EntityBlock>,
}

impl DeviceBlock {
    /// Project `device`; absent text fields become empty strings.
    #[must_use]
    pub fn new(device: &Device, entities: Vec<EntityBlock>) -> Self {
        Self {
            device_id: device.id.to_string(),
            name: device.name.clone().unwrap_or_default(),
            manufacturer: device.manufacturer.clone().unwrap_or_default(),
            model: device.model.clone().unwrap_or_default(),
            entities,
        }
    }
}

/// Projection of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBlock {
    pub entity_id: String,
    pub name: String,
    pub domain: String,
    pub labels: Vec<String>,
    pub disabled: bool,
}

impl From<&Entity> for EntityBlock {
    fn from(entity: &Entity) -> Self {
        Self {
            entity_id: entity.entity_id.to_string(),
            name: entity.name.clone().unwrap_or_default(),
            domain: entity.entity_id.domain().to_string(),
            labels: entity.labels(),
            disabled: entity.is_disabled(),
        }
    }
}

/// Summary of one config entry and the exported devices it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationBlock {
    pub entry_id: String,
    pub domain: String,
    pub title: String,
    pub state: String,
    pub device_ids: Vec<String>,
}

impl IntegrationBlock {
    #[must_use]
    pub fn new(entry: &ConfigEntry, device_ids: &[DeviceId]) -> Self {
        Self {
            entry_id: entry.id.to_string(),
            domain: entry.domain.clone(),
            title: entry.title.clone(),
            state: entry.state.to_string(),
            device_ids: device_ids.iter().map(ToString::to_string).collect(),
        }
    }
}

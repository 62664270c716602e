//! Snapshot builder — projects the live registries into a [`SnapshotDocument`].
//!
//! The builder only reads. Any registry failure aborts the whole build; a
//! partial document is never returned.

use std::collections::HashMap;

use hasnap_domain::area::Area;
use hasnap_domain::device::Device;
use hasnap_domain::entity::Entity;
use hasnap_domain::error::SnapshotError;
use hasnap_domain::id::{AreaId, ConfigEntryId, DeviceId};
use hasnap_domain::snapshot::{
    AreaBlock, DEFAULT_FLOOR_ID, DeviceBlock, EntityBlock, ExportMetadata, Floor, GENERATED_BY,
    IntegrationBlock, SnapshotDocument,
};

use crate::ports::{AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository};

/// Filters and layout switches for one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Leave out devices missing a name or a manufacturer.
    pub skip_nameless_devices: bool,
    /// Keep entities that are currently disabled.
    pub include_disabled_entities: bool,
    /// Group areas named `"<floor> - <area>"` under their own floor.
    pub floors_from_area_names: bool,
    /// Append a summary of the config entries owning exported devices.
    pub include_integrations: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            skip_nameless_devices: true,
            include_disabled_entities: false,
            floors_from_area_names: false,
            include_integrations: false,
        }
    }
}

/// How a run resolves the entities of a device. Chosen once per run.
enum EntityLookup {
    /// Ask the registry for each device's entities.
    Indexed,
    /// Filter one full enumeration by owning device.
    Scan(Vec<Entity>),
}

impl EntityLookup {
    async fn resolve<ER: EntityRepository>(
        &self,
        repo: &ER,
        device_id: &DeviceId,
        include_disabled: bool,
    ) -> Result<Vec<Entity>, SnapshotError> {
        match self {
            Self::Indexed => repo.find_by_device_id(device_id, include_disabled).await,
            Self::Scan(all) => Ok(all
                .iter()
                .filter(|entity| entity.device_id.as_ref() == Some(device_id))
                .filter(|entity| include_disabled || !entity.is_disabled())
                .cloned()
                .collect()),
        }
    }
}

/// One area block plus the registry area it came from (`None` for the
/// synthetic unassigned block).
struct AreaSlot {
    area: Option<Area>,
    block: AreaBlock,
}

/// Area blocks in insertion order, addressable by area id.
struct AreaIndex {
    slots: Vec<AreaSlot>,
    positions: HashMap<AreaId, usize>,
}

impl AreaIndex {
    fn new(areas: Vec<Area>) -> Self {
        let mut slots = Vec::with_capacity(areas.len() + 1);
        let mut positions = HashMap::with_capacity(areas.len());
        for area in areas {
            if positions.contains_key(&area.id) {
                continue;
            }
            positions.insert(area.id.clone(), slots.len());
            slots.push(AreaSlot {
                block: AreaBlock::new(area.id.to_string(), area.name.clone()),
                area: Some(area),
            });
        }
        slots.push(AreaSlot {
            area: None,
            block: AreaBlock::unassigned(),
        });
        Self { slots, positions }
    }

    /// Append `device` to its area block, or to the unassigned block when the
    /// area is missing or unknown.
    fn place(&mut self, area_id: Option<&AreaId>, device: DeviceBlock) {
        let unassigned = self.slots.len() - 1;
        let position = area_id
            .and_then(|id| self.positions.get(id).copied())
            .unwrap_or(unassigned);
        self.slots[position].block.devices.push(device);
    }

    /// Everything on the synthetic default floor.
    fn into_single_floor(self) -> Vec<Floor> {
        let areas = self.slots.into_iter().map(|slot| slot.block).collect();
        vec![Floor::default_floor(areas)]
    }

    /// Areas whose name carries a floor prefix go to that floor (prefix
    /// stripped); the rest, including the unassigned block, go to the default
    /// floor, which comes last.
    fn into_prefixed_floors(self) -> Vec<Floor> {
        let mut floors: Vec<Floor> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut default_areas = Vec::new();

        for AreaSlot { area, mut block } in self.slots {
            let prefix = area.as_ref().and_then(|area| {
                area.floor_prefix()
                    .map(|(label, rest)| (label.to_string(), rest.to_string()))
            });
            let Some((label, rest)) = prefix else {
                default_areas.push(block);
                continue;
            };
            let floor_id = label.to_lowercase();
            if floor_id == DEFAULT_FLOOR_ID {
                default_areas.push(block);
                continue;
            }
            block.name = rest;
            let position = *positions.entry(floor_id.clone()).or_insert_with(|| {
                floors.push(Floor {
                    floor_id,
                    name: label,
                    areas: Vec::new(),
                });
                floors.len() - 1
            });
            floors[position].areas.push(block);
        }

        floors.push(Floor::default_floor(default_areas));
        floors
    }
}

/// Builds snapshot documents from the four registries.
pub struct SnapshotBuilder<DR, ER, AR, CR> {
    devices: DR,
    entities: ER,
    areas: AR,
    config_entries: CR,
}

impl<DR, ER, AR, CR> SnapshotBuilder<DR, ER, AR, CR>
where
    DR: DeviceRepository + Send + Sync,
    ER: EntityRepository + Send + Sync,
    AR: AreaRepository + Send + Sync,
    CR: ConfigEntryRepository + Send + Sync,
{
    /// Create a builder reading from the given registries.
    pub fn new(devices: DR, entities: ER, areas: AR, config_entries: CR) -> Self {
        Self {
            devices,
            entities,
            areas,
            config_entries,
        }
    }

    /// Build a document from the current registry contents.
    ///
    /// # Errors
    ///
    /// Propagates the first registry failure; no document is produced then.
    #[tracing::instrument(skip(self))]
    pub async fn build(&self, options: &ExportOptions) -> Result<SnapshotDocument, SnapshotError> {
        let mut index = AreaIndex::new(self.areas.get_all().await?);
        let devices = self.devices.get_all().await?;
        let lookup = self.entity_lookup().await?;

        let mut included: Vec<&Device> = Vec::with_capacity(devices.len());
        let mut entity_count = 0_usize;
        for device in &devices {
            if options.skip_nameless_devices && device.is_nameless() {
                tracing::debug!(
                    device_id = %device.id,
                    name = ?device.name,
                    manufacturer = ?device.manufacturer,
                    "skipping device without name or manufacturer"
                );
                continue;
            }

            let entities = lookup
                .resolve(&self.entities, &device.id, options.include_disabled_entities)
                .await?;
            entity_count += entities.len();
            let block = DeviceBlock::new(device, entities.iter().map(EntityBlock::from).collect());
            index.place(device.area_id.as_ref(), block);
            included.push(device);
        }

        let floors = if options.floors_from_area_names {
            index.into_prefixed_floors()
        } else {
            index.into_single_floor()
        };

        let integrations = if options.include_integrations {
            Some(self.integrations(&included).await?)
        } else {
            None
        };

        tracing::info!(
            devices = included.len(),
            entities = entity_count,
            "snapshot built"
        );

        Ok(SnapshotDocument {
            export_metadata: ExportMetadata {
                generated_by: GENERATED_BY.to_string(),
                skip_nameless_devices: options.skip_nameless_devices,
                include_disabled_entities: options.include_disabled_entities,
                floors_from_area_names: options.floors_from_area_names,
            },
            floors,
            integrations,
        })
    }

    async fn entity_lookup(&self) -> Result<EntityLookup, SnapshotError> {
        if self.entities.supports_device_lookup() {
            return Ok(EntityLookup::Indexed);
        }
        tracing::warn!(
            "entity registry has no lookup by device; falling back to filtering all entities"
        );
        Ok(EntityLookup::Scan(self.entities.get_all().await?))
    }

    /// Group included devices under their first config entry, in config
    /// entry registry order. Entries owning no included device are left out.
    async fn integrations(
        &self,
        included: &[&Device],
    ) -> Result<Vec<IntegrationBlock>, SnapshotError> {
        let mut owned: HashMap<&ConfigEntryId, Vec<DeviceId>> = HashMap::new();
        for device in included {
            if let Some(entry_id) = device.primary_config_entry() {
                owned.entry(entry_id).or_default().push(device.id.clone());
            }
        }

        let entries = self.config_entries.get_all().await?;
        let blocks: Vec<IntegrationBlock> = entries
            .iter()
            .filter_map(|entry| {
                owned
                    .get(&entry.id)
                    .map(|device_ids| IntegrationBlock::new(entry, device_ids))
            })
            .collect();

        if blocks.len() < owned.len() {
            tracing::debug!(
                referenced = owned.len(),
                known = blocks.len(),
                "some devices reference unknown config entries"
            );
        }
        Ok(blocks)
    }
}

//! In-memory collaborators for the router tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hasnap_app::ports::{
    AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository, Notifier,
    SnapshotSink,
};
use hasnap_app::services::{ExportOptions, SnapshotService, SnapshotSettings};
use hasnap_domain::area::Area;
use hasnap_domain::config_entry::ConfigEntry;
use hasnap_domain::device::Device;
use hasnap_domain::entity::{DisabledBy, Entity, EntityUpdate};
use hasnap_domain::error::{NotFoundError, SnapshotError};
use hasnap_domain::id::EntityId;
use hasnap_domain::notification::Notification;
use tempfile::TempDir;

use crate::state::AppState;

pub struct Registry {
    devices: Vec<Device>,
    areas: Vec<Area>,
    entities: Mutex<Vec<Entity>>,
}

impl DeviceRepository for Registry {
    async fn get_all(&self) -> Result<Vec<Device>, SnapshotError> {
        Ok(self.devices.clone())
    }
}

impl AreaRepository for Registry {
    async fn get_all(&self) -> Result<Vec<Area>, SnapshotError> {
        Ok(self.areas.clone())
    }
}

impl ConfigEntryRepository for Registry {
    async fn get_all(&self) -> Result<Vec<ConfigEntry>, SnapshotError> {
        Ok(Vec::new())
    }
}

impl EntityRepository for Registry {
    async fn get_all(&self) -> Result<Vec<Entity>, SnapshotError> {
        Ok(self.entities.lock().unwrap().clone())
    }

    async fn find_by_entity_id(&self, entity_id: &EntityId) -> Result<Option<Entity>, SnapshotError> {
        Ok(self
            .entities
            .lock()
            .unwrap()
            .iter()
            .find(|e| &e.entity_id == entity_id)
            .cloned())
    }

    async fn update(
        &self,
        entity_id: &EntityId,
        update: EntityUpdate,
    ) -> Result<Entity, SnapshotError> {
        let mut entities = self.entities.lock().unwrap();
        let entity = entities
            .iter_mut()
            .find(|e| &e.entity_id == entity_id)
            .ok_or_else(|| NotFoundError {
                entity: "Entity",
                id: entity_id.to_string(),
            })?;
        entity.apply(&update);
        Ok(entity.clone())
    }
}

/// Writes files straight into a directory.
pub struct DirSink {
    dir: PathBuf,
}

impl SnapshotSink for DirSink {
    async fn write(&self, file_name: &str, contents: String) -> Result<String, SnapshotError> {
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents).map_err(|err| SnapshotError::Storage(Box::new(err)))?;
        Ok(path.display().to_string())
    }
}

#[derive(Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl Notifier for MemoryNotifier {
    async fn create(&self, notification: Notification) -> Result<(), SnapshotError> {
        let mut store = self.notifications.lock().unwrap();
        store.retain(|n| n.notification_id != notification.notification_id);
        store.push(notification);
        Ok(())
    }

    async fn dismiss(&self, notification_id: &str) -> Result<(), SnapshotError> {
        self.notifications
            .lock()
            .unwrap()
            .retain(|n| n.notification_id != notification_id);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Notification>, SnapshotError> {
        Ok(self.notifications.lock().unwrap().clone())
    }
}

pub type TestState = AppState<
    Arc<Registry>,
    Arc<Registry>,
    Arc<Registry>,
    Arc<Registry>,
    DirSink,
    Arc<MemoryNotifier>,
>;

/// A kitchen bulb with one enabled and one disabled entity, plus a nameless
/// helper device.
pub struct Fixture {
    temp: TempDir,
    registry: Arc<Registry>,
    notifier: Arc<MemoryNotifier>,
}

impl Fixture {
    pub fn kitchen() -> Self {
        let registry = Registry {
            devices: vec![
                Device::builder()
                    .id("d1")
                    .name("Bulb")
                    .manufacturer("Acme")
                    .area_id("kitchen")
                    .build()
                    .unwrap(),
                Device::builder().id("helper").build().unwrap(),
            ],
            areas: vec![Area::builder().id("kitchen").name("Kitchen").build().unwrap()],
            entities: Mutex::new(vec![
                Entity::builder()
                    .entity_id("light.kitchen")
                    .name("Kitchen Light")
                    .device_id("d1")
                    .build()
                    .unwrap(),
                Entity::builder()
                    .entity_id("sensor.kitchen_battery")
                    .device_id("d1")
                    .disabled_by(DisabledBy::Integration)
                    .build()
                    .unwrap(),
                Entity::builder()
                    .entity_id("sensor.helper")
                    .device_id("helper")
                    .build()
                    .unwrap(),
            ]),
        };
        Self {
            temp: TempDir::new().unwrap(),
            registry: Arc::new(registry),
            notifier: Arc::new(MemoryNotifier::default()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.temp.path()
    }

    pub fn state(&self, settings: SnapshotSettings) -> TestState {
        let service = SnapshotService::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            Arc::clone(&self.registry),
            DirSink {
                dir: self.temp.path().to_path_buf(),
            },
            Arc::clone(&self.notifier),
            settings,
        );
        AppState::new(service, ExportOptions::default())
    }

    pub fn entity_name(&self, entity_id: &str) -> Option<String> {
        self.registry
            .entities
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.entity_id.as_str() == entity_id)
            .and_then(|e| e.name.clone())
    }
}

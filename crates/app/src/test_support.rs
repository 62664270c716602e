//! In-memory registry fakes shared by the service tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use hasnap_domain::area::Area;
use hasnap_domain::config_entry::ConfigEntry;
use hasnap_domain::device::Device;
use hasnap_domain::entity::{Entity, EntityUpdate};
use hasnap_domain::error::{NotFoundError, SnapshotError};
use hasnap_domain::id::{DeviceId, EntityId};
use hasnap_domain::notification::Notification;

use crate::ports::{
    AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository, Notifier,
    SnapshotSink,
};

#[derive(Debug, thiserror::Error)]
#[error("registry offline")]
pub struct Offline;

fn offline() -> SnapshotError {
    SnapshotError::Storage(Box::new(Offline))
}

/// A registry holding devices, entities, areas, and config entries in
/// insertion order.
#[derive(Default)]
pub struct InMemoryRegistry {
    pub devices: Vec<Device>,
    pub areas: Vec<Area>,
    pub config_entries: Vec<ConfigEntry>,
    pub entities: Mutex<Vec<Entity>>,
    /// Serve the device-indexed lookup.
    pub indexed: bool,
    /// Fail every read.
    pub offline: bool,
    /// Fail only the device-indexed lookup.
    pub fail_device_lookup: bool,
    /// Fail the update of this entity.
    pub fail_update_of: Option<EntityId>,
    /// Count calls, by method name.
    pub calls: Mutex<HashMap<&'static str, usize>>,
}

impl InMemoryRegistry {
    pub fn with_entities(entities: Vec<Entity>) -> Self {
        Self {
            entities: Mutex::new(entities),
            ..Self::default()
        }
    }

    pub fn entity(&self, entity_id: &str) -> Option<Entity> {
        self.entities
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.entity_id.as_str() == entity_id)
            .cloned()
    }

    pub fn entity_snapshot(&self) -> Vec<Entity> {
        self.entities.lock().unwrap().clone()
    }

    pub fn calls(&self, method: &'static str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().unwrap().entry(method).or_default() += 1;
    }

    fn read<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, SnapshotError> {
        if self.offline {
            return Err(offline());
        }
        Ok(items.to_vec())
    }
}

impl DeviceRepository for InMemoryRegistry {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, SnapshotError>> + Send {
        let result = self.read(&self.devices);
        async { result }
    }
}

impl AreaRepository for InMemoryRegistry {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Area>, SnapshotError>> + Send {
        let result = self.read(&self.areas);
        async { result }
    }
}

impl ConfigEntryRepository for InMemoryRegistry {
    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, SnapshotError>> + Send {
        let result = self.read(&self.config_entries);
        async { result }
    }
}

impl EntityRepository for InMemoryRegistry {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Entity>, SnapshotError>> + Send {
        self.record("get_all");
        let result = self.read(&self.entities.lock().unwrap());
        async { result }
    }

    fn find_by_entity_id(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, SnapshotError>> + Send {
        self.record("find_by_entity_id");
        let result = if self.offline {
            Err(offline())
        } else {
            Ok(self.entity(entity_id.as_str()))
        };
        async { result }
    }

    fn update(
        &self,
        entity_id: &EntityId,
        update: EntityUpdate,
    ) -> impl Future<Output = Result<Entity, SnapshotError>> + Send {
        self.record("update");
        let result = if self.fail_update_of.as_ref() == Some(entity_id) {
            Err(offline())
        } else {
            let mut entities = self.entities.lock().unwrap();
            match entities.iter_mut().find(|e| &e.entity_id == entity_id) {
                Some(entity) => {
                    entity.apply(&update);
                    Ok(entity.clone())
                }
                None => Err(NotFoundError {
                    entity: "Entity",
                    id: entity_id.to_string(),
                }
                .into()),
            }
        };
        async { result }
    }

    fn supports_device_lookup(&self) -> bool {
        self.indexed
    }

    fn find_by_device_id(
        &self,
        device_id: &DeviceId,
        include_disabled: bool,
    ) -> impl Future<Output = Result<Vec<Entity>, SnapshotError>> + Send {
        self.record("find_by_device_id");
        let result = if !self.indexed {
            Err(SnapshotError::Unsupported("entity lookup by device"))
        } else if self.offline || self.fail_device_lookup {
            Err(offline())
        } else {
            Ok(self
                .entities
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.device_id.as_ref() == Some(device_id))
                .filter(|e| include_disabled || !e.is_disabled())
                .cloned()
                .collect())
        };
        async { result }
    }
}

/// Sink keeping every written blob in memory.
#[derive(Default)]
pub struct InMemorySink {
    pub files: Mutex<HashMap<String, String>>,
    pub broken: bool,
}

impl SnapshotSink for InMemorySink {
    fn write(
        &self,
        file_name: &str,
        contents: String,
    ) -> impl Future<Output = Result<String, SnapshotError>> + Send {
        let result = if self.broken {
            Err(offline())
        } else {
            self.files
                .lock()
                .unwrap()
                .insert(file_name.to_string(), contents);
            Ok(format!("memory://{file_name}"))
        };
        async { result }
    }
}

/// Notifier keeping notifications in creation order.
#[derive(Default)]
pub struct InMemoryNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl Notifier for InMemoryNotifier {
    fn create(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), SnapshotError>> + Send {
        let mut store = self.notifications.lock().unwrap();
        store.retain(|n| n.notification_id != notification.notification_id);
        store.push(notification);
        async { Ok(()) }
    }

    fn dismiss(
        &self,
        notification_id: &str,
    ) -> impl Future<Output = Result<(), SnapshotError>> + Send {
        self.notifications
            .lock()
            .unwrap()
            .retain(|n| n.notification_id != notification_id);
        async { Ok(()) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Notification>, SnapshotError>> + Send {
        let result = self.notifications.lock().unwrap().clone();
        async { Ok(result) }
    }
}

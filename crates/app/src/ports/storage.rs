//! Registry ports — read access to devices, areas, and config entries, and
//! read/partial-write access to entities.
//!
//! The host owns these registries. Enumeration order is the registry's own
//! order and is assumed stable across two enumerations within one run.

use std::future::Future;
use std::sync::Arc;

use hasnap_domain::area::Area;
use hasnap_domain::config_entry::ConfigEntry;
use hasnap_domain::device::Device;
use hasnap_domain::entity::{Entity, EntityUpdate};
use hasnap_domain::error::SnapshotError;
use hasnap_domain::id::{DeviceId, EntityId};

/// Read access to the device registry.
pub trait DeviceRepository {
    /// Enumerate every device in registry order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, SnapshotError>> + Send;
}

/// Read access to the area registry.
pub trait AreaRepository {
    /// Enumerate every area in registry order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Area>, SnapshotError>> + Send;
}

/// Read access to the configured integrations.
pub trait ConfigEntryRepository {
    /// Enumerate every config entry.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, SnapshotError>> + Send;
}

/// Access to the entity registry.
///
/// The full enumeration, point lookup, and partial update are mandatory.
/// The device-indexed lookup is an optional capability: registries that
/// cannot serve it keep the default [`supports_device_lookup`](Self::supports_device_lookup)
/// and callers fall back to filtering [`get_all`](Self::get_all).
pub trait EntityRepository {
    /// Enumerate every entity in registry order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Entity>, SnapshotError>> + Send;

    /// Look up an entity by its exact identifier.
    fn find_by_entity_id(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, SnapshotError>> + Send;

    /// Apply a partial update to the entity with this identifier.
    ///
    /// Only the fields staged in `update` may change. Returns the entity as
    /// stored after the update.
    fn update(
        &self,
        entity_id: &EntityId,
        update: EntityUpdate,
    ) -> impl Future<Output = Result<Entity, SnapshotError>> + Send;

    /// Whether [`find_by_device_id`](Self::find_by_device_id) is available.
    fn supports_device_lookup(&self) -> bool {
        false
    }

    /// Entities owned by `device_id`, excluding disabled ones unless
    /// `include_disabled` is set.
    ///
    /// Only meaningful when [`supports_device_lookup`](Self::supports_device_lookup)
    /// returns `true`; the default returns [`SnapshotError::Unsupported`].
    fn find_by_device_id(
        &self,
        device_id: &DeviceId,
        include_disabled: bool,
    ) -> impl Future<Output = Result<Vec<Entity>, SnapshotError>> + Send {
        let _ = (device_id, include_disabled);
        async { Err(SnapshotError::Unsupported("entity lookup by device")) }
    }
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for Arc<T> {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, SnapshotError>> + Send {
        (**self).get_all()
    }
}

impl<T: AreaRepository + Send + Sync> AreaRepository for Arc<T> {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Area>, SnapshotError>> + Send {
        (**self).get_all()
    }
}

impl<T: ConfigEntryRepository + Send + Sync> ConfigEntryRepository for Arc<T> {
    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, SnapshotError>> + Send {
        (**self).get_all()
    }
}

impl<T: EntityRepository + Send + Sync> EntityRepository for Arc<T> {
    fn get_all(&self) -> impl Future<Output = Result<Vec<Entity>, SnapshotError>> + Send {
        (**self).get_all()
    }

    fn find_by_entity_id(
        &self,
        entity_id: &EntityId,
    ) -> impl Future<Output = Result<Option<Entity>, SnapshotError>> + Send {
        (**self).find_by_entity_id(entity_id)
    }

    fn update(
        &self,
        entity_id: &EntityId,
        update: EntityUpdate,
    ) -> impl Future<Output = Result<Entity, SnapshotError>> + Send {
        (**self).update(entity_id, update)
    }

    fn supports_device_lookup(&self) -> bool {
        (**self).supports_device_lookup()
    }

    fn find_by_device_id(
        &self,
        device_id: &DeviceId,
        include_disabled: bool,
    ) -> impl Future<Output = Result<Vec<Entity>, SnapshotError>> + Send {
        (**self).find_by_device_id(device_id, include_disabled)
    }
}

//! Device — a physical or logical unit exposing one or more entities.

use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, ValidationError};
use crate::id::{AreaId, ConfigEntryId, DeviceId};

/// A registered device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub sw_version: Option<String>,
    pub hw_version: Option<String>,
    pub area_id: Option<AreaId>,
    /// Config entries (integrations) that own this device, in registration order.
    #[serde(default)]
    pub config_entries: Vec<ConfigEntryId>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] when `id` is empty.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        Ok(())
    }

    /// Whether the device lacks a display name or a manufacturer.
    ///
    /// Helper and virtual devices typically have neither; these are the
    /// "back of house" devices an export skips by default.
    #[must_use]
    pub fn is_nameless(&self) -> bool {
        fn blank(value: Option<&String>) -> bool {
            value.is_none_or(String::is_empty)
        }
        blank(self.name.as_ref()) || blank(self.manufacturer.as_ref())
    }

    /// The first config entry referencing this device, if any.
    #[must_use]
    pub fn primary_config_entry(&self) -> Option<&ConfigEntryId> {
        self.config_entries.first()
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    manufacturer: Option<String>,
    model: Option<String>,
    sw_version: Option<String>,
    hw_version: Option<String>,
    area_id: Option<AreaId>,
    config_entries: Vec<ConfigEntryId>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn sw_version(mut self, version: impl Into<String>) -> Self {
        self.sw_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn hw_version(mut self, version: impl Into<String>) -> Self {
        self.hw_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn area_id(mut self, area_id: impl Into<AreaId>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    #[must_use]
    pub fn config_entry(mut self, entry_id: impl Into<ConfigEntryId>) -> Self {
        let entry_id = entry_id.into();
        if !self.config_entries.contains(&entry_id) {
            self.config_entries.push(entry_id);
        }
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] if `id` is missing or empty.
    pub fn build(self) -> Result<Device, SnapshotError> {
        let device = Device {
            id: self.id.unwrap_or_else(|| DeviceId::new("")),
            name: self.name,
            manufacturer: self.manufacturer,
            model: self.model,
            sw_version: self.sw_version,
            hw_version: self.hw_version,
            area_id: self.area_id,
            config_entries: self.config_entries,
        };
        device.validate()?;
        Ok(device)
    }
}

//! Entity — the smallest addressable unit of state or control.
//!
//! An entity is exposed by at most one device and may carry its own area
//! override. Its extension options are shared with other consumers; see
//! [`EntityOptions`].

mod disabled;
mod options;

pub use disabled::{DisabledBy, UnknownDisabledBy};
pub use options::{EntityOptions, LABELS_KEY, SNAPSHOT_NAMESPACE};

use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, ValidationError};
use crate::id::{AreaId, DeviceId, EntityId};

/// A registered entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: EntityId,
    pub unique_id: String,
    pub name: Option<String>,
    pub device_id: Option<DeviceId>,
    pub area_id: Option<AreaId>,
    pub device_class: Option<String>,
    pub unit_of_measurement: Option<String>,
    pub icon: Option<String>,
    pub platform: String,
    pub disabled_by: Option<DisabledBy>,
    #[serde(default)]
    pub options: EntityOptions,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] when `entity_id` is empty.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.entity_id.is_empty() {
            return Err(ValidationError::EmptyEntityId.into());
        }
        Ok(())
    }

    /// Whether the entity is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled_by.is_some()
    }

    /// Labels stored under this system's namespace.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.options.labels()
    }

    /// Apply a partial update; fields absent from `update` are left untouched.
    pub fn apply(&mut self, update: &EntityUpdate) {
        if let Some(name) = &update.name {
            self.name = Some(name.clone());
        }
        if let Some(options) = &update.options {
            self.options = options.clone();
        }
    }
}

/// Partial field set accepted by an entity update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityUpdate {
    pub name: Option<String>,
    pub options: Option<EntityOptions>,
}

impl EntityUpdate {
    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.options.is_none()
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    entity_id: Option<EntityId>,
    unique_id: Option<String>,
    name: Option<String>,
    device_id: Option<DeviceId>,
    area_id: Option<AreaId>,
    device_class: Option<String>,
    unit_of_measurement: Option<String>,
    icon: Option<String>,
    platform: Option<String>,
    disabled_by: Option<DisabledBy>,
    options: EntityOptions,
}

impl EntityBuilder {
    #[must_use]
    pub fn entity_id(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    #[must_use]
    pub fn area_id(mut self, area_id: impl Into<AreaId>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    #[must_use]
    pub fn device_class(mut self, device_class: impl Into<String>) -> Self {
        self.device_class = Some(device_class.into());
        self
    }

    #[must_use]
    pub fn unit_of_measurement(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measurement = Some(unit.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    #[must_use]
    pub fn disabled_by(mut self, disabled_by: DisabledBy) -> Self {
        self.disabled_by = Some(disabled_by);
        self
    }

    #[must_use]
    pub fn options(mut self, options: EntityOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn labels(mut self, labels: &[&str]) -> Self {
        let labels: Vec<String> = labels.iter().map(|l| (*l).to_string()).collect();
        self.options = self.options.with_labels(&labels);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// `unique_id` defaults to the entity id and `platform` to its domain.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] if `entity_id` is missing or empty.
    pub fn build(self) -> Result<Entity, SnapshotError> {
        let entity_id = self.entity_id.unwrap_or_else(|| EntityId::new(""));
        let entity = Entity {
            unique_id: self
                .unique_id
                .unwrap_or_else(|| entity_id.as_str().to_string()),
            platform: self
                .platform
                .unwrap_or_else(|| entity_id.domain().to_string()),
            entity_id,
            name: self.name,
            device_id: self.device_id,
            area_id: self.area_id,
            device_class: self.device_class,
            unit_of_measurement: self.unit_of_measurement,
            icon: self.icon,
            disabled_by: self.disabled_by,
            options: self.options,
        };
        entity.validate()?;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen_light() -> Entity {
        Entity::builder()
            .entity_id("light.kitchen")
            .name("Kitchen Light")
            .device_id("d1")
            .build()
            .unwrap()
    }

    #[test]
    fn should_default_unique_id_and_platform_from_entity_id() {
        let entity = kitchen_light();
        assert_eq!(entity.unique_id, "light.kitchen");
        assert_eq!(entity.platform, "light");
    }

    #[test]
    fn should_return_validation_error_when_entity_id_missing() {
        let result = Entity::builder().name("Nameless").build();
        assert!(matches!(
            result,
            Err(SnapshotError::Validation(ValidationError::EmptyEntityId))
        ));
    }

    #[test]
    fn should_report_disabled_when_disabled_by_set() {
        let entity = Entity::builder()
            .entity_id("sensor.old")
            .disabled_by(DisabledBy::User)
            .build()
            .unwrap();
        assert!(entity.is_disabled());
        assert!(!kitchen_light().is_disabled());
    }

    #[test]
    fn should_read_labels_set_through_builder() {
        let entity = Entity::builder()
            .entity_id("light.kitchen")
            .labels(&["Lighting", "Kitchen"])
            .build()
            .unwrap();
        assert_eq!(entity.labels(), vec!["Lighting", "Kitchen"]);
    }

    #[test]
    fn should_apply_only_staged_fields() {
        let mut entity = kitchen_light();
        let before = entity.clone();
        let options = entity.options.with_labels(&["Lighting".to_string()]);

        entity.apply(&EntityUpdate {
            name: None,
            options: Some(options),
        });

        assert_eq!(entity.name, before.name);
        assert_eq!(entity.device_id, before.device_id);
        assert_eq!(entity.labels(), vec!["Lighting"]);
    }

    #[test]
    fn should_report_empty_update_when_nothing_staged() {
        assert!(EntityUpdate::default().is_empty());
        assert!(
            !EntityUpdate {
                name: Some("x".to_string()),
                options: None
            }
            .is_empty()
        );
    }
}

//! Area — a user-defined physical location grouping devices.

use serde::{Deserialize, Serialize};

use crate::error::{SnapshotError, ValidationError};
use crate::id::AreaId;

/// A user-defined location such as a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub picture: Option<String>,
}

impl Area {
    /// Create a builder for constructing an [`Area`].
    #[must_use]
    pub fn builder() -> AreaBuilder {
        AreaBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] when `id` or `name` is empty.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Split a `"<floor> - <area>"` style name into its floor label and the
    /// remaining area name.
    ///
    /// The floor label is a run of word characters (alphanumeric or `_`),
    /// followed by optional whitespace, a `-`, and optional whitespace.
    /// Returns `None` when the name does not follow that convention or when
    /// nothing is left after the separator.
    ///
    /// A bare prefix such as `"L1 -"` is deliberately not split, unlike the
    /// plain `^(\w+)\s*-\s*(.*)$` convention, which would yield floor `L1`
    /// with an empty area name. Such areas keep their full name and stay on
    /// the default floor.
    #[must_use]
    pub fn floor_prefix(&self) -> Option<(&str, &str)> {
        let name = self.name.as_str();
        let label_end = name
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map_or(name.len(), |(idx, _)| idx);
        if label_end == 0 {
            return None;
        }
        let (label, rest) = name.split_at(label_end);
        let rest = rest.trim_start().strip_prefix('-')?.trim_start();
        if rest.is_empty() {
            return None;
        }
        Some((label, rest))
    }
}

/// Step-by-step builder for [`Area`].
#[derive(Debug, Default)]
pub struct AreaBuilder {
    id: Option<AreaId>,
    name: Option<String>,
    picture: Option<String>,
}

impl AreaBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<AreaId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    /// Consume the builder, validate, and return an [`Area`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Validation`] if `id` or `name` is missing or empty.
    pub fn build(self) -> Result<Area, SnapshotError> {
        let area = Area {
            id: self.id.unwrap_or_else(|| AreaId::new("")),
            name: self.name.unwrap_or_default(),
            picture: self.picture,
        };
        area.validate()?;
        Ok(area)
    }
}

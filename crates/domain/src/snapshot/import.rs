//! Lenient read side of the snapshot document.
//!
//! Imports accept any JSON object shaped like a [`SnapshotDocument`](super::SnapshotDocument)
//! or a subset of it. Every level may be missing or `null`, unknown fields are
//! ignored, and only `entity_id`, `name`, and `labels` are read from each leaf.

use serde::Deserialize;

use crate::error::DocumentError;

/// A parsed import document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportDocument {
    #[serde(default)]
    pub floors: Option<Vec<ImportFloor>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportFloor {
    #[serde(default)]
    pub areas: Option<Vec<ImportArea>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportArea {
    #[serde(default)]
    pub devices: Option<Vec<ImportDevice>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportDevice {
    #[serde(default)]
    pub entities: Option<Vec<ImportEntity>>,
}

/// One leaf entity record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportEntity {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl ImportDocument {
    /// Parse document text.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] when the text is not JSON or when its
    /// shape contradicts the schema (root not an object, a list level holding
    /// something else, a leaf field of the wrong type).
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Iterate over every leaf entity record in document order.
    pub fn records(&self) -> impl Iterator<Item = &ImportEntity> {
        self.floors
            .iter()
            .flatten()
            .flat_map(|floor| floor.areas.iter().flatten())
            .flat_map(|area| area.devices.iter().flatten())
            .flat_map(|device| device.entities.iter().flatten())
    }
}

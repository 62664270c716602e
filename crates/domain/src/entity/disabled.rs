//! Reason an entity is currently disabled.

use serde::{Deserialize, Serialize};

/// Who disabled an entity. Presence on an entity means it is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledBy {
    User,
    Integration,
    ConfigEntry,
    Device,
    Hass,
}

impl DisabledBy {
    /// Wire representation, as stored by the registry.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Integration => "integration",
            Self::ConfigEntry => "config_entry",
            Self::Device => "device",
            Self::Hass => "hass",
        }
    }
}

impl std::fmt::Display for DisabledBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DisabledBy {
    type Err = UnknownDisabledBy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "integration" => Ok(Self::Integration),
            "config_entry" => Ok(Self::ConfigEntry),
            "device" => Ok(Self::Device),
            "hass" => Ok(Self::Hass),
            other => Err(UnknownDisabledBy(other.to_string())),
        }
    }
}

/// Unrecognised disabled-by marker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disabled_by value: {0}")]
pub struct UnknownDisabledBy(pub String);

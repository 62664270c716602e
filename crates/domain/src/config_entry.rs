//! Config entry — one configured instance of an integration.
//!
//! Devices reference config entries; this crate never creates or mutates them.

use serde::{Deserialize, Serialize};

use crate::id::ConfigEntryId;

/// Lifecycle state of a config entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigEntryState {
    #[default]
    NotLoaded,
    Loaded,
    SetupError,
    SetupRetry,
    MigrationError,
    FailedUnload,
}

impl ConfigEntryState {
    /// Wire representation, as stored by the registry.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotLoaded => "not_loaded",
            Self::Loaded => "loaded",
            Self::SetupError => "setup_error",
            Self::SetupRetry => "setup_retry",
            Self::MigrationError => "migration_error",
            Self::FailedUnload => "failed_unload",
        }
    }
}

impl std::fmt::Display for ConfigEntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfigEntryState {
    type Err = UnknownConfigEntryState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_loaded" => Ok(Self::NotLoaded),
            "loaded" => Ok(Self::Loaded),
            "setup_error" => Ok(Self::SetupError),
            "setup_retry" => Ok(Self::SetupRetry),
            "migration_error" => Ok(Self::MigrationError),
            "failed_unload" => Ok(Self::FailedUnload),
            other => Err(UnknownConfigEntryState(other.to_string())),
        }
    }
}

/// Unrecognised config entry state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown config entry state: {0}")]
pub struct UnknownConfigEntryState(pub String);

/// A configured integration instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub id: ConfigEntryId,
    /// Integration domain, e.g. `hue`.
    pub domain: String,
    pub title: String,
    /// How the entry was created (`user`, `import`, `zeroconf`, …).
    pub source: String,
    pub state: ConfigEntryState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_not_loaded() {
        assert_eq!(ConfigEntryState::default(), ConfigEntryState::NotLoaded);
    }

    #[test]
    fn should_parse_wire_representation() {
        let state: ConfigEntryState = "setup_retry".parse().unwrap();
        assert_eq!(state, ConfigEntryState::SetupRetry);
        assert_eq!(state.to_string(), "setup_retry");
    }

    #[test]
    fn should_reject_unknown_state() {
        assert!("exploded".parse::<ConfigEntryState>().is_err());
    }
}

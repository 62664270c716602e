//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `hasnap.toml` in the working directory (or the file named by
//! `HASNAP_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::PathBuf;

use hasnap_app::services::{ExportOptions, SnapshotSettings};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "hasnap.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Export output and defaults.
    pub snapshot: SnapshotConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Registry seed loaded when the database holds no devices yet.
    pub seed: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Where exports go and which filters apply when a request does not say.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Directory the snapshot file is written to and served from.
    pub output_dir: PathBuf,
    pub file_name: String,
    /// URL prefix of the download link.
    pub download_base: String,
    /// Indent the written JSON.
    pub pretty: bool,
    pub skip_nameless_devices: bool,
    pub include_disabled_entities: bool,
    pub floors_from_area_names: bool,
    pub include_integrations: bool,
}

impl Config {
    /// Load configuration from `hasnap.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("HASNAP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("HASNAP_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("HASNAP_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("HASNAP_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("HASNAP_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("HASNAP_SEED") {
            self.database.seed = Some(PathBuf::from(val));
        }
        if let Some(val) = var("HASNAP_OUTPUT_DIR") {
            self.snapshot.output_dir = PathBuf::from(val);
        }
        if let Some(val) = var("HASNAP_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.snapshot.file_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "snapshot file name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl SnapshotConfig {
    /// Settings handed to the snapshot service.
    #[must_use]
    pub fn settings(&self) -> SnapshotSettings {
        SnapshotSettings {
            file_name: self.file_name.clone(),
            download_base: self.download_base.clone(),
            pretty: self.pretty,
        }
    }

    /// Filters used when an export request leaves them out.
    #[must_use]
    pub fn export_defaults(&self) -> ExportOptions {
        ExportOptions {
            skip_nameless_devices: self.skip_nameless_devices,
            include_disabled_entities: self.include_disabled_entities,
            floors_from_area_names: self.floors_from_area_names,
            include_integrations: self.include_integrations,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:hasnap.db?mode=rwc".to_string(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hasnapd=info,hasnap=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        let settings = SnapshotSettings::default();
        let options = ExportOptions::default();
        Self {
            output_dir: PathBuf::from("www"),
            file_name: settings.file_name,
            download_base: settings.download_base,
            pretty: settings.pretty,
            skip_nameless_devices: options.skip_nameless_devices,
            include_disabled_entities: options.include_disabled_entities,
            floors_from_area_names: options.floors_from_area_names,
            include_integrations: options.include_integrations,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

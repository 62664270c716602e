//! # hasnap-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the registry port traits defined in `hasnap-app::ports::storage`
//!   (including the indexed entity lookup by device)
//! - Implement the `Notifier` port as a notification table
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Load a registry seed file into an empty database
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `hasnap-app` (for port traits) and `hasnap-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod area_repo;
pub mod config_entry_repo;
pub mod device_repo;
pub mod entity_repo;
pub mod error;
pub mod notification_store;
pub mod pool;
pub mod seed;

pub use area_repo::SqliteAreaRepository;
pub use config_entry_repo::SqliteConfigEntryRepository;
pub use device_repo::SqliteDeviceRepository;
pub use entity_repo::SqliteEntityRepository;
pub use error::StorageError;
pub use notification_store::SqliteNotificationStore;
pub use pool::{Config, Database};
pub use seed::RegistrySeed;

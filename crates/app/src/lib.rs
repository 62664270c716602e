//! # hasnap-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository`, `AreaRepository`, `ConfigEntryRepository` — registry reads
//!   - `EntityRepository` — entity reads, partial updates, and the optional
//!     lookup by device
//!   - `SnapshotSink` — persist a serialized snapshot
//!   - `Notifier` — persistent user-visible notifications
//! - Define **use-cases**:
//!   - `SnapshotBuilder` — project the registries into a snapshot document
//!   - `Reconciler` — re-apply names and labels from a document
//!   - `SnapshotService` — `export_data` / `import_data` orchestration
//!
//! ## Dependency rule
//! Depends on `hasnap-domain` only (plus `tokio::sync` for the run lock).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;

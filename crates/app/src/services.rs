//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod reconciler;
pub mod snapshot_builder;
pub mod snapshot_service;

pub use reconciler::{ImportTally, Reconciler};
pub use snapshot_builder::{ExportOptions, SnapshotBuilder};
pub use snapshot_service::{
    ExportReport, ExportRequest, SnapshotService, SnapshotSettings, import_limitations,
};

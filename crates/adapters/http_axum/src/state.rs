//! Shared application state for axum handlers.

use std::sync::Arc;

use hasnap_app::services::{ExportOptions, SnapshotService};

/// Application state shared across all axum handlers.
///
/// Generic over the registry, sink, and notifier types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<DR, ER, AR, CR, S, N> {
    /// Export/import orchestration.
    pub snapshot_service: Arc<SnapshotService<DR, ER, AR, CR, S, N>>,
    /// Options used for fields an export request leaves out.
    pub export_defaults: ExportOptions,
}

impl<DR, ER, AR, CR, S, N> Clone for AppState<DR, ER, AR, CR, S, N> {
    fn clone(&self) -> Self {
        Self {
            snapshot_service: Arc::clone(&self.snapshot_service),
            export_defaults: self.export_defaults,
        }
    }
}

impl<DR, ER, AR, CR, S, N> AppState<DR, ER, AR, CR, S, N> {
    /// Create a new application state around a service instance.
    pub fn new(
        snapshot_service: SnapshotService<DR, ER, AR, CR, S, N>,
        export_defaults: ExportOptions,
    ) -> Self {
        Self::from_arc(Arc::new(snapshot_service), export_defaults)
    }

    /// Create a new application state from a pre-wrapped service.
    pub fn from_arc(
        snapshot_service: Arc<SnapshotService<DR, ER, AR, CR, S, N>>,
        export_defaults: ExportOptions,
    ) -> Self {
        Self {
            snapshot_service,
            export_defaults,
        }
    }
}

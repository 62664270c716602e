//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod notifications;
#[allow(clippy::missing_errors_doc)]
pub mod services;

use axum::Router;
use axum::routing::{delete, get, post};

use hasnap_app::ports::{
    AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository, Notifier,
    SnapshotSink,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<DR, ER, AR, CR, S, N>() -> Router<AppState<DR, ER, AR, CR, S, N>>
where
    DR: DeviceRepository + Send + Sync + 'static,
    ER: EntityRepository + Clone + Send + Sync + 'static,
    AR: AreaRepository + Send + Sync + 'static,
    CR: ConfigEntryRepository + Send + Sync + 'static,
    S: SnapshotSink + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    Router::new()
        // Services
        .route(
            "/services/export_data",
            post(services::export_data::<DR, ER, AR, CR, S, N>),
        )
        .route(
            "/services/import_data",
            post(services::import_data::<DR, ER, AR, CR, S, N>),
        )
        .route("/import/limitations", get(services::limitations))
        // Notifications
        .route(
            "/notifications",
            get(notifications::list::<DR, ER, AR, CR, S, N>),
        )
        .route(
            "/notifications/{id}",
            delete(notifications::dismiss::<DR, ER, AR, CR, S, N>),
        )
}

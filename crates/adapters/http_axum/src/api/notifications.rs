//! Handlers for persistent notifications.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use hasnap_app::ports::{
    AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository, Notifier,
    SnapshotSink,
};
use hasnap_domain::notification::Notification;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Notification>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the dismiss endpoint.
pub enum DismissResponse {
    NoContent,
}

impl IntoResponse for DismissResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/notifications`
pub async fn list<DR, ER, AR, CR, S, N>(
    State(state): State<AppState<DR, ER, AR, CR, S, N>>,
) -> Result<ListResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    ER: EntityRepository + Clone + Send + Sync + 'static,
    AR: AreaRepository + Send + Sync + 'static,
    CR: ConfigEntryRepository + Send + Sync + 'static,
    S: SnapshotSink + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let notifications = state.snapshot_service.notifications().await?;
    Ok(ListResponse::Ok(Json(notifications)))
}

/// `DELETE /api/notifications/{id}`
pub async fn dismiss<DR, ER, AR, CR, S, N>(
    State(state): State<AppState<DR, ER, AR, CR, S, N>>,
    Path(id): Path<String>,
) -> Result<DismissResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    ER: EntityRepository + Clone + Send + Sync + 'static,
    AR: AreaRepository + Send + Sync + 'static,
    CR: ConfigEntryRepository + Send + Sync + 'static,
    S: SnapshotSink + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    state.snapshot_service.dismiss_notification(&id).await?;
    Ok(DismissResponse::NoContent)
}

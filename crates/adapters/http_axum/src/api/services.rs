//! Handlers for the `export_data` and `import_data` service calls.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hasnap_app::ports::{
    AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository, Notifier,
    SnapshotSink,
};
use hasnap_app::services::{
    ExportOptions, ExportReport, ExportRequest, ImportTally, import_limitations,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for an export. Absent fields fall back to the configured
/// defaults; `notify` defaults to `false`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportDataRequest {
    #[serde(default)]
    pub notify: bool,
    pub skip_nameless_devices: Option<bool>,
    pub include_disabled_entities: Option<bool>,
    pub floors_from_area_names: Option<bool>,
    pub include_integrations: Option<bool>,
}

impl ExportDataRequest {
    fn into_request(self, defaults: ExportOptions) -> ExportRequest {
        ExportRequest {
            options: ExportOptions {
                skip_nameless_devices: self
                    .skip_nameless_devices
                    .unwrap_or(defaults.skip_nameless_devices),
                include_disabled_entities: self
                    .include_disabled_entities
                    .unwrap_or(defaults.include_disabled_entities),
                floors_from_area_names: self
                    .floors_from_area_names
                    .unwrap_or(defaults.floors_from_area_names),
                include_integrations: self
                    .include_integrations
                    .unwrap_or(defaults.include_integrations),
            },
            notify: self.notify,
        }
    }
}

/// Query string of an import.
#[derive(Debug, Default, Deserialize)]
pub struct ImportDataQuery {
    #[serde(default)]
    pub notify: bool,
}

/// Possible responses from the export endpoint.
pub enum ExportResponse {
    Ok(Json<ExportReport>),
}

impl IntoResponse for ExportResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the import endpoint.
pub enum ImportResponse {
    Ok(Json<ImportTally>),
}

impl IntoResponse for ImportResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

#[derive(Serialize)]
pub struct LimitationsBody {
    pub message: &'static str,
}

/// `POST /api/services/export_data`
pub async fn export_data<DR, ER, AR, CR, S, N>(
    State(state): State<AppState<DR, ER, AR, CR, S, N>>,
    body: Option<Json<ExportDataRequest>>,
) -> Result<ExportResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    ER: EntityRepository + Clone + Send + Sync + 'static,
    AR: AreaRepository + Send + Sync + 'static,
    CR: ConfigEntryRepository + Send + Sync + 'static,
    S: SnapshotSink + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let request = body.into_request(state.export_defaults);
    let report = state.snapshot_service.export_data(request).await?;
    Ok(ExportResponse::Ok(Json(report)))
}

/// `POST /api/services/import_data?notify=`
///
/// The body is the snapshot document itself.
pub async fn import_data<DR, ER, AR, CR, S, N>(
    State(state): State<AppState<DR, ER, AR, CR, S, N>>,
    Query(query): Query<ImportDataQuery>,
    body: String,
) -> Result<ImportResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
    ER: EntityRepository + Clone + Send + Sync + 'static,
    AR: AreaRepository + Send + Sync + 'static,
    CR: ConfigEntryRepository + Send + Sync + 'static,
    S: SnapshotSink + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let tally = state
        .snapshot_service
        .import_data(&body, query.notify)
        .await?;
    Ok(ImportResponse::Ok(Json(tally)))
}

/// `GET /api/import/limitations`
pub async fn limitations() -> Json<LimitationsBody> {
    Json(LimitationsBody {
        message: import_limitations(),
    })
}

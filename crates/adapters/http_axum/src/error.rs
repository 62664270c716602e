//! HTTP error response mapping.

use std::error::Error;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hasnap_domain::error::SnapshotError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SnapshotError`] to an HTTP response with appropriate status code.
pub struct ApiError(SnapshotError);

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        Self(err)
    }
}

fn with_sources(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SnapshotError::Validation(_) | SnapshotError::Document(_) => {
                (StatusCode::BAD_REQUEST, with_sources(&self.0))
            }
            SnapshotError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            SnapshotError::Unsupported(what) => {
                (StatusCode::NOT_IMPLEMENTED, format!("unsupported: {what}"))
            }
            SnapshotError::ImportAborted {
                changes_applied,
                changes_skipped,
                ..
            } => {
                tracing::error!(error = %with_sources(&self.0), "import aborted");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!(
                        "import aborted after {changes_applied} applied and {changes_skipped} skipped changes"
                    ),
                )
            }
            SnapshotError::Storage(_) => {
                tracing::error!(error = %with_sources(&self.0), "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

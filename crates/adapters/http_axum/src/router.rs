//! Axum router assembly.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use hasnap_app::ports::{
    AreaRepository, ConfigEntryRepository, DeviceRepository, EntityRepository, Notifier,
    SnapshotSink,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and serves `output_dir` under the service's
/// download base when that base is a local path (e.g. `/local`).
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<DR, ER, AR, CR, S, N>(
    state: AppState<DR, ER, AR, CR, S, N>,
    output_dir: &Path,
) -> Router
where
    DR: DeviceRepository + Send + Sync + 'static,
    ER: EntityRepository + Clone + Send + Sync + 'static,
    AR: AreaRepository + Send + Sync + 'static,
    CR: ConfigEntryRepository + Send + Sync + 'static,
    S: SnapshotSink + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    let download_base = state
        .snapshot_service
        .settings()
        .download_base
        .trim_end_matches('/')
        .to_string();

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes());

    let router = if download_base.starts_with('/') && download_base != "/api" {
        router.nest_service(&download_base, ServeDir::new(output_dir))
    } else {
        tracing::info!(%download_base, "download base is not a local path, not serving output directory");
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, TestState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use hasnap_app::services::SnapshotSettings;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    fn app(fixture: &Fixture, state: TestState) -> Router {
        build(state, fixture.output_dir())
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let fixture = Fixture::kitchen();
        let response = send(
            app(&fixture, fixture.state(SnapshotSettings::default())),
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_export_with_defaults_when_body_missing() {
        let fixture = Fixture::kitchen();
        let response = send(
            app(&fixture, fixture.state(SnapshotSettings::default())),
            Request::builder()
                .method("POST")
                .uri("/api/services/export_data")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["download_url"], "/local/ha_snapshot_data.json");
        assert_eq!(body["devices"], 1);
        assert_eq!(body["entities"], 1);
    }

    #[tokio::test]
    async fn should_apply_request_options_and_notify() {
        let fixture = Fixture::kitchen();
        let state = fixture.state(SnapshotSettings::default());
        let response = send(
            app(&fixture, state.clone()),
            Request::builder()
                .method("POST")
                .uri("/api/services/export_data")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"notify": true, "skip_nameless_devices": false, "include_disabled_entities": true}"#,
                ))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["devices"], 2);
        assert_eq!(body["entities"], 3);

        let response = send(
            app(&fixture, state),
            Request::builder()
                .uri("/api/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body[0]["notification_id"], "ha_snapshot_export_data");
        assert_eq!(body[0]["title"], "HA Snapshot Created");
    }

    #[tokio::test]
    async fn should_serve_exported_file_under_download_base() {
        let fixture = Fixture::kitchen();
        let state = fixture.state(SnapshotSettings::default());
        send(
            app(&fixture, state.clone()),
            Request::builder()
                .method("POST")
                .uri("/api/services/export_data")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        let response = send(
            app(&fixture, state),
            Request::builder()
                .uri("/local/ha_snapshot_data.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["export_metadata"]["generated_by"], "ha_snapshot");
    }

    #[tokio::test]
    async fn should_import_document_and_return_tally() {
        let fixture = Fixture::kitchen();
        let document = r#"{"floors":[{"areas":[{"devices":[{"entities":[
            {"entity_id":"light.kitchen","name":"Ceiling","labels":["lighting"]},
            {"entity_id":"light.ghost","name":"Ghost"}
        ]}]}]}]}"#;
        let response = send(
            app(&fixture, fixture.state(SnapshotSettings::default())),
            Request::builder()
                .method("POST")
                .uri("/api/services/import_data?notify=true")
                .body(Body::from(document))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["changes_applied"], 1);
        assert_eq!(body["changes_skipped"], 1);
        assert_eq!(fixture.entity_name("light.kitchen").as_deref(), Some("Ceiling"));
    }

    #[tokio::test]
    async fn should_reject_malformed_import_with_bad_request() {
        let fixture = Fixture::kitchen();
        let response = send(
            app(&fixture, fixture.state(SnapshotSettings::default())),
            Request::builder()
                .method("POST")
                .uri("/api/services/import_data")
                .body(Body::from("definitely not json"))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("invalid snapshot document")
        );
        assert_eq!(fixture.entity_name("light.kitchen").as_deref(), Some("Kitchen Light"));
    }

    #[tokio::test]
    async fn should_describe_import_limitations() {
        let fixture = Fixture::kitchen();
        let response = send(
            app(&fixture, fixture.state(SnapshotSettings::default())),
            Request::builder()
                .uri("/api/import/limitations")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        let body = json_body(response).await;
        assert!(body["message"].as_str().unwrap().contains("names and labels"));
    }

    #[tokio::test]
    async fn should_dismiss_notification() {
        let fixture = Fixture::kitchen();
        let state = fixture.state(SnapshotSettings::default());
        send(
            app(&fixture, state.clone()),
            Request::builder()
                .method("POST")
                .uri("/api/services/import_data?notify=true")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;

        let response = send(
            app(&fixture, state.clone()),
            Request::builder()
                .method("DELETE")
                .uri("/api/notifications/ha_snapshot_import_data")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(
            app(&fixture, state),
            Request::builder()
                .uri("/api/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn should_not_serve_files_when_download_base_is_remote() {
        let fixture = Fixture::kitchen();
        let settings = SnapshotSettings {
            download_base: "https://files.example.com".to_string(),
            ..SnapshotSettings::default()
        };
        let response = send(
            app(&fixture, fixture.state(settings)),
            Request::builder()
                .uri("/local/ha_snapshot_data.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! HTTP API tests
//!
//! Exercises the router with in-process requests via `tower::ServiceExt`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use linewatch::config::ServiceConfig;
use linewatch::server::{create_router, AppState};
use linewatch::service::PredictionService;

fn test_router(dir: &std::path::Path) -> axum::Router {
    let config = ServiceConfig {
        dataset_path: dir.join("absent.csv").display().to_string(),
        models_dir: dir.display().to_string(),
        ..Default::default()
    };
    let state = Arc::new(AppState {
        service: PredictionService::new(config),
    });
    create_router(state)
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_untrained_state() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_trained"], false);
    assert_eq!(body["dataset_available"], false);
}

#[tokio::test]
async fn test_predict_before_training_is_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(json_request("/predict", json!({"data": {"s1": 1.0}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("not trained"));
}

#[tokio::test]
async fn test_train_with_missing_dataset_is_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(json_request(
            "/train-model",
            json!({
                "trainStart": "2025-08-01",
                "trainEnd": "2025-08-31",
                "testStart": "2025-09-01",
                "testEnd": "2025-09-30",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_simulate_rejects_unparseable_dates() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(json_request(
            "/simulate",
            json!({
                "simulationStart": "whenever",
                "simulationEnd": "2025-09-30",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], true);
}

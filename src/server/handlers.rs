//! HTTP request handlers

use std::sync::Arc;
use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::error::{ApiError, Result};
use super::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRequest {
    pub train_start: String,
    pub train_end: String,
    pub test_start: String,
    pub test_end: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub simulation_start: String,
    pub simulation_end: String,
}

/// Train a model over the requested windows. Training is CPU-bound, so it
/// runs off the async runtime.
pub async fn train_model(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TrainRequest>,
) -> Result<Json<serde_json::Value>> {
    info!(
        train_start = %req.train_start,
        train_end = %req.train_end,
        test_start = %req.test_start,
        test_end = %req.test_end,
        "Training requested"
    );

    let metrics = tokio::task::spawn_blocking(move || {
        state
            .service
            .train(&req.train_start, &req.train_end, &req.test_start, &req.test_end)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(json!({
        "status": "success",
        "metrics": metrics,
    })))
}

/// Score a single feature record.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<serde_json::Value>> {
    let result = state.service.predict(&req.data)?;
    Ok(Json(json!({
        "prediction": result.prediction,
        "confidence": result.confidence,
    })))
}

/// Batched retrospective predictions over a historical window.
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<serde_json::Value>> {
    info!(
        simulation_start = %req.simulation_start,
        simulation_end = %req.simulation_end,
        "Simulation requested"
    );

    let results = tokio::task::spawn_blocking(move || {
        state
            .service
            .simulate(&req.simulation_start, &req.simulation_end)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(json!({
        "status": "success",
        "results": results,
    })))
}

/// Service health and readiness.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model_trained": state.service.store().is_trained(),
        "dataset_available": state.service.dataset_available(),
    }))
}

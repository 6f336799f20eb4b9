//! Scoring: single records and time-windowed batch simulation
//!
//! Both paths classify at a fixed 0.5 threshold and report confidence as the
//! probability mass of the predicted class. Confidence and display values
//! are never NaN or infinite in a returned result; such values become null.

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::config::ServiceConfig;
use crate::dataset::{column_timestamps, TimeWindow};
use crate::error::{Result, ServiceError};
use crate::store::ModelStore;

/// Decision threshold for predict and simulate.
pub const PREDICTION_THRESHOLD: f64 = 0.5;
/// Rows scored per batch during simulation, bounding peak memory.
pub const SIMULATION_BATCH_SIZE: usize = 1000;

const TEMPERATURE_FIELD: &str = "L3_S29_F3430";
const TEMPERATURE_DEFAULT: f64 = 25.0;
const PRESSURE_FIELD: &str = "L3_S29_F3429";
const PRESSURE_DEFAULT: f64 = 1000.0;
const HUMIDITY_FIELD: &str = "L3_S29_F3436";
const HUMIDITY_DEFAULT: f64 = 50.0;

/// Outcome of scoring one record.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub prediction: u8,
    pub confidence: Option<f64>,
}

/// Highlighted sensor readings attached to each simulation row.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayParameters {
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

/// One row of simulation output.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRow {
    pub timestamp: String,
    pub id: i64,
    pub prediction: u8,
    pub confidence: Option<f64>,
    pub parameters: DisplayParameters,
}

pub struct InferenceEngine<'a> {
    config: &'a ServiceConfig,
    store: &'a ModelStore,
}

/// Map non-finite values to None so they serialize as null, never NaN.
fn sanitize(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn confidence_for(probability: f64, label: u8) -> Option<f64> {
    let mass = if label == 1 {
        probability
    } else {
        1.0 - probability
    };
    sanitize(mass)
}

fn any_to_f64(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Float64(v) => Some(*v),
        AnyValue::Float32(v) => Some(*v as f64),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::Int32(v) => Some(*v as f64),
        AnyValue::Int16(v) => Some(*v as f64),
        AnyValue::Int8(v) => Some(*v as f64),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::UInt32(v) => Some(*v as f64),
        AnyValue::UInt16(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(*v as f64),
        _ => None,
    }
}

/// Display-field lookup: absent column or null value falls back to the
/// documented default; a present but non-finite value becomes null.
fn display_value(df: &DataFrame, column: &str, row: usize, default: f64) -> Option<f64> {
    let Ok(col) = df.column(column) else {
        return Some(default);
    };
    match col.get(row) {
        Ok(AnyValue::Null) | Err(_) => Some(default),
        Ok(value) => match any_to_f64(&value) {
            Some(v) if v.is_finite() => Some(v),
            Some(_) => None,
            None => Some(default),
        },
    }
}

fn row_id(df: &DataFrame, column: &str, row: usize, fallback: i64) -> i64 {
    df.column(column)
        .ok()
        .and_then(|col| col.get(row).ok().as_ref().and_then(any_to_f64))
        .map(|v| v as i64)
        .unwrap_or(fallback)
}

impl<'a> InferenceEngine<'a> {
    pub fn new(config: &'a ServiceConfig, store: &'a ModelStore) -> Self {
        Self { config, store }
    }

    /// Score a single feature record against the stored model.
    pub fn predict_one(
        &self,
        record: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Prediction> {
        let artifact = self.store.load()?;

        let features = artifact.schema.reconcile(record);
        let probability = artifact.model.predict_row_proba(&features);
        let prediction = u8::from(probability > PREDICTION_THRESHOLD);

        Ok(Prediction {
            prediction,
            confidence: confidence_for(probability, prediction),
        })
    }

    /// Batched retrospective predictions over a time window of the dataset.
    pub fn simulate(&self, df: &DataFrame, window: &TimeWindow) -> Result<Vec<SimulationRow>> {
        let artifact = self.store.load()?;

        let timestamps = column_timestamps(df, &self.config.timestamp_column)?;
        let rows = window.select(&timestamps);
        if rows.is_empty() {
            return Err(ServiceError::EmptyWindow(
                "simulation data range is empty".to_string(),
            ));
        }
        info!(records = rows.len(), "Running simulation");

        let mut results = Vec::with_capacity(rows.len());
        for chunk in rows.chunks(SIMULATION_BATCH_SIZE) {
            let x = artifact.schema.matrix(df, chunk)?;
            let probs = artifact.model.predict_proba(&x);
            debug_assert_eq!(probs.len(), chunk.len());

            for (offset, &row) in chunk.iter().enumerate() {
                let probability = probs[offset];
                let prediction = u8::from(probability > PREDICTION_THRESHOLD);
                // Positional index within the windowed subset when the
                // dataset carries no explicit id.
                let fallback_id = results.len() as i64;

                results.push(SimulationRow {
                    timestamp: timestamps[row]
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default(),
                    id: row_id(df, &self.config.id_column, row, fallback_id),
                    prediction,
                    confidence: confidence_for(probability, prediction),
                    parameters: DisplayParameters {
                        temperature: display_value(df, TEMPERATURE_FIELD, row, TEMPERATURE_DEFAULT),
                        pressure: display_value(df, PRESSURE_FIELD, row, PRESSURE_DEFAULT),
                        humidity: display_value(df, HUMIDITY_FIELD, row, HUMIDITY_DEFAULT),
                    },
                });
            }
        }

        Ok(results)
    }
}

//! Transport-independent service operations
//!
//! One `PredictionService` instance owns the model store and is shared by
//! every request. Each operation is an independent, synchronous unit of
//! work: the dataset is re-read per request and the only shared mutable
//! state is the artifact pair inside the store.

use polars::prelude::DataFrame;
use tracing::info;

use crate::config::ServiceConfig;
use crate::dataset::{load_csv, TimeWindow};
use crate::error::Result;
use crate::inference::{InferenceEngine, Prediction, SimulationRow};
use crate::metrics::EvalMetrics;
use crate::store::ModelStore;
use crate::trainer::Trainer;

pub struct PredictionService {
    config: ServiceConfig,
    store: ModelStore,
}

impl PredictionService {
    pub fn new(config: ServiceConfig) -> Self {
        let store = ModelStore::new(&config.models_dir);
        Self { config, store }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn dataset_available(&self) -> bool {
        std::path::Path::new(&self.config.dataset_path).exists()
    }

    fn load_dataset(&self) -> Result<DataFrame> {
        let df = load_csv(&self.config.dataset_path)?;
        info!(
            path = %self.config.dataset_path,
            records = df.height(),
            "Dataset loaded"
        );
        Ok(df)
    }

    /// Train on `[train_start, train_end]`, evaluate on
    /// `[test_start, test_end]`, persist the artifact pair, return metrics.
    pub fn train(
        &self,
        train_start: &str,
        train_end: &str,
        test_start: &str,
        test_end: &str,
    ) -> Result<EvalMetrics> {
        let train_window = TimeWindow::parse(train_start, train_end)?;
        let test_window = TimeWindow::parse(test_start, test_end)?;

        let df = self.load_dataset()?;
        Trainer::new(&self.config, &self.store).train(&df, &train_window, &test_window)
    }

    /// Score a single feature record.
    pub fn predict(
        &self,
        record: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Prediction> {
        InferenceEngine::new(&self.config, &self.store).predict_one(record)
    }

    /// Batched retrospective predictions over a historical window.
    pub fn simulate(
        &self,
        simulation_start: &str,
        simulation_end: &str,
    ) -> Result<Vec<SimulationRow>> {
        let window = TimeWindow::parse(simulation_start, simulation_end)?;
        let df = self.load_dataset()?;
        InferenceEngine::new(&self.config, &self.store).simulate(&df, &window)
    }
}

//! Imbalance-aware training protocol
//!
//! Fits the boosted classifier on one time window and evaluates it on a
//! disjoint later window. The positive class is up-weighted by
//! `negatives / max(positives, 1)` recomputed from the train subset on every
//! call. Evaluation metrics use a fixed 0.3 threshold, deliberately below the
//! 0.5 inference threshold to favor recall on the rare failure class.

use polars::prelude::DataFrame;
use tracing::info;

use crate::boosting::{BoostedClassifier, BoostingConfig};
use crate::config::ServiceConfig;
use crate::dataset::{column_timestamps, feature_matrix, label_vector, TimeWindow};
use crate::error::{Result, ServiceError};
use crate::metrics::{imbalance_weight, EvalMetrics};
use crate::schema::FeatureSchema;
use crate::store::ModelStore;

/// Decision threshold used for test-set metric computation.
pub const EVAL_THRESHOLD: f64 = 0.3;

pub struct Trainer<'a> {
    config: &'a ServiceConfig,
    store: &'a ModelStore,
    boosting: BoostingConfig,
}

impl<'a> Trainer<'a> {
    pub fn new(config: &'a ServiceConfig, store: &'a ModelStore) -> Self {
        Self {
            config,
            store,
            boosting: BoostingConfig::default(),
        }
    }

    /// Override the boosting configuration (smaller budgets in tests).
    pub fn with_boosting(mut self, boosting: BoostingConfig) -> Self {
        self.boosting = boosting;
        self
    }

    /// Train on `train_window`, evaluate on `test_window`, and persist the
    /// model and schema as one pair. Metrics are only returned on full
    /// success; fit and persistence failures surface as `TrainingFailed`.
    pub fn train(
        &self,
        df: &DataFrame,
        train_window: &TimeWindow,
        test_window: &TimeWindow,
    ) -> Result<EvalMetrics> {
        let timestamps = column_timestamps(df, &self.config.timestamp_column)?;

        let train_rows = train_window.select(&timestamps);
        let test_rows = test_window.select(&timestamps);
        info!(
            total_records = df.height(),
            train_records = train_rows.len(),
            test_records = test_rows.len(),
            "Filtered dataset into train and test windows"
        );

        if train_rows.is_empty() || test_rows.is_empty() {
            return Err(ServiceError::EmptyWindow(
                "one or more date ranges are empty".to_string(),
            ));
        }

        // Schema comes from the full dataset so every window shares one
        // column ordering.
        let schema = FeatureSchema::derive(df, &self.config.label_column);

        let x_train = feature_matrix(df, schema.columns(), &train_rows)?;
        let y_train = label_vector(df, &self.config.label_column, &train_rows)?;
        let x_test = feature_matrix(df, schema.columns(), &test_rows)?;
        let y_test = label_vector(df, &self.config.label_column, &test_rows)?;

        let pos_weight = imbalance_weight(&y_train);
        info!(
            positives = y_train.iter().filter(|&&v| v > 0.5).count(),
            pos_weight,
            features = schema.len(),
            "Fitting boosted classifier"
        );

        let model = BoostedClassifier::fit(
            self.boosting.clone(),
            &x_train,
            &y_train,
            pos_weight,
            &x_test,
            &y_test,
        )
        .map_err(|e| ServiceError::TrainingFailed(e.to_string()))?;

        let probs = model.predict_proba(&x_test);
        let metrics = EvalMetrics::at_threshold(&y_test, &probs, EVAL_THRESHOLD);
        info!(
            rounds = model.n_rounds(),
            accuracy = metrics.accuracy,
            precision = metrics.precision,
            recall = metrics.recall,
            f1 = metrics.f1_score,
            "Training complete"
        );

        self.store
            .save(model, schema)
            .map_err(|e| ServiceError::TrainingFailed(e.to_string()))?;

        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn small_boosting() -> BoostingConfig {
        BoostingConfig {
            max_rounds: 20,
            early_stopping_rounds: 5,
            max_depth: 3,
            ..Default::default()
        }
    }

    fn telemetry_df() -> DataFrame {
        // 20 train rows in August, 10 test rows in September. The failure
        // label tracks s1 exceeding 5.
        let mut timestamps = Vec::new();
        let mut s1 = Vec::new();
        let mut s2 = Vec::new();
        let mut response = Vec::new();
        for day in 1..=20 {
            timestamps.push(format!("2025-08-{day:02} 10:00:00"));
            let v = (day % 10) as f64;
            s1.push(v);
            s2.push(10.0 - v);
            response.push(i64::from(v > 5.0));
        }
        for day in 1..=10 {
            timestamps.push(format!("2025-09-{day:02} 10:00:00"));
            let v = (day % 10) as f64;
            s1.push(v);
            s2.push(10.0 - v);
            response.push(i64::from(v > 5.0));
        }

        df!(
            "synthetic_timestamp" => &timestamps,
            "s1" => &s1,
            "s2" => &s2,
            "Response" => &response
        )
        .unwrap()
    }

    fn config() -> ServiceConfig {
        ServiceConfig::default()
    }

    #[test]
    fn test_train_produces_metrics_and_persists_pair() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let config = config();
        let trainer = Trainer::new(&config, &store).with_boosting(small_boosting());

        let df = telemetry_df();
        let train_window = TimeWindow::parse("2025-08-01", "2025-08-31").unwrap();
        let test_window = TimeWindow::parse("2025-09-01", "2025-09-30").unwrap();

        let metrics = trainer.train(&df, &train_window, &test_window).unwrap();
        assert!(metrics.accuracy > 0.5, "accuracy was {}", metrics.accuracy);
        assert!(store.is_trained());

        let artifact = store.load().unwrap();
        assert_eq!(artifact.schema.columns(), &["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn test_empty_train_window_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let config = config();
        let trainer = Trainer::new(&config, &store).with_boosting(small_boosting());

        let df = telemetry_df();
        let train_window = TimeWindow::parse("2030-01-01", "2030-02-01").unwrap();
        let test_window = TimeWindow::parse("2025-09-01", "2025-09-30").unwrap();

        let err = trainer.train(&df, &train_window, &test_window).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyWindow(_)));
        // Nothing persisted on failure.
        assert!(!store.is_trained());
    }

    #[test]
    fn test_empty_test_window_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let config = config();
        let trainer = Trainer::new(&config, &store).with_boosting(small_boosting());

        let df = telemetry_df();
        let train_window = TimeWindow::parse("2025-08-01", "2025-08-31").unwrap();
        let test_window = TimeWindow::parse("2030-01-01", "2030-02-01").unwrap();

        let err = trainer.train(&df, &train_window, &test_window).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyWindow(_)));
    }
}

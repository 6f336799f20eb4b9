//! Feature schema: the ordered numeric-column contract between training and
//! inference
//!
//! The schema is derived once at training time from the full dataset, so the
//! train, test, and simulation subsets all share one column ordering. Every
//! record scored later is reconciled onto this ordering: missing fields
//! become 0, extra fields are dropped.

use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::preprocess::{feature_matrix, numeric_feature_columns};
use crate::error::Result;

/// Ordered, immutable list of feature column names fixed at training time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// Derive the schema from the full dataset, excluding the label column.
    pub fn derive(df: &DataFrame, label_column: &str) -> Self {
        Self {
            columns: numeric_feature_columns(df, label_column),
        }
    }

    #[cfg(test)]
    pub fn from_columns(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Map an arbitrary input record onto the schema's column order.
    ///
    /// Missing fields become 0.0, non-numeric values become 0.0, and fields
    /// not in the schema are ignored. Reconciling an already-reconciled
    /// vector against the same schema returns the identical vector.
    pub fn reconcile(&self, record: &serde_json::Map<String, serde_json::Value>) -> Vec<f64> {
        self.columns
            .iter()
            .map(|name| record.get(name).and_then(|v| v.as_f64()).unwrap_or(0.0))
            .collect()
    }

    /// Build the feature matrix for a set of dataset rows in schema order.
    /// A schema column absent from the frame contributes zeros, mirroring
    /// the single-record path.
    pub fn matrix(&self, df: &DataFrame, rows: &[usize]) -> Result<Array2<f64>> {
        let (present, missing): (Vec<String>, Vec<String>) = self
            .columns
            .iter()
            .cloned()
            .partition(|name| df.column(name).is_ok());

        if missing.is_empty() {
            return feature_matrix(df, &self.columns, rows);
        }

        let partial = feature_matrix(df, &present, rows)?;
        let mut full = Array2::zeros((rows.len(), self.columns.len()));
        for (j, name) in present.iter().enumerate() {
            if let Some(target) = self.columns.iter().position(|c| c == name) {
                for r in 0..rows.len() {
                    full[[r, target]] = partial[[r, j]];
                }
            }
        }
        Ok(full)
    }
}

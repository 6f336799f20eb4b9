//! Boosted binary classifier with weighted log-loss gradients and early
//! stopping against a held-out evaluation set.

use ndarray::{Array1, Array2, ArrayView1};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use super::tree::RegressionTree;
use crate::error::{Result, ServiceError};

/// Boosting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostingConfig {
    /// Cap on the number of boosting rounds.
    pub max_rounds: usize,
    /// Stop once held-out loss has not improved for this many rounds.
    pub early_stopping_rounds: usize,
    /// Shrinkage applied to every tree's contribution.
    pub learning_rate: f64,
    /// Maximum depth per tree.
    pub max_depth: usize,
    /// Minimum samples per leaf.
    pub min_samples_leaf: usize,
    /// Row subsample ratio per round.
    pub subsample: f64,
    /// Random seed for subsampling.
    pub random_state: Option<u64>,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            max_rounds: 500,
            early_stopping_rounds: 25,
            learning_rate: 0.1,
            max_depth: 6,
            min_samples_leaf: 1,
            subsample: 0.8,
            random_state: Some(42),
        }
    }
}

/// A fitted gradient-boosted binary classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedClassifier {
    config: BoostingConfig,
    trees: Vec<RegressionTree>,
    initial_log_odds: f64,
}

fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

fn log_loss(y: &Array1<f64>, scores: &Array1<f64>) -> f64 {
    let total: f64 = y
        .iter()
        .zip(scores.iter())
        .map(|(&yi, &s)| {
            let p = sigmoid(s).clamp(1e-15, 1.0 - 1e-15);
            -(yi * p.ln() + (1.0 - yi) * (1.0 - p).ln())
        })
        .sum();
    total / y.len() as f64
}

impl BoostedClassifier {
    /// Fit on the training set with the positive class up-weighted by
    /// `pos_weight`, evaluating held-out log-loss after every round. The
    /// returned model is truncated to the best-scoring round.
    pub fn fit(
        config: BoostingConfig,
        x_train: &Array2<f64>,
        y_train: &Array1<f64>,
        pos_weight: f64,
        x_eval: &Array2<f64>,
        y_eval: &Array1<f64>,
    ) -> Result<Self> {
        let n = x_train.nrows();
        if n == 0 || x_eval.nrows() == 0 {
            return Err(ServiceError::Data(
                "training and evaluation sets must be non-empty".to_string(),
            ));
        }
        if n != y_train.len() {
            return Err(ServiceError::Data(format!(
                "training label length {} does not match {} rows",
                y_train.len(),
                n
            )));
        }

        let weights: Vec<f64> = y_train
            .iter()
            .map(|&y| if y > 0.5 { pos_weight } else { 1.0 })
            .collect();

        // Weighted base rate as the starting point.
        let weight_sum: f64 = weights.iter().sum();
        let positive_weight_sum: f64 = weights
            .iter()
            .zip(y_train.iter())
            .filter(|(_, &y)| y > 0.5)
            .map(|(w, _)| w)
            .sum();
        let p0 = (positive_weight_sum / weight_sum).clamp(1e-6, 1.0 - 1e-6);
        let initial_log_odds = (p0 / (1.0 - p0)).ln();

        let mut train_scores = Array1::from_elem(n, initial_log_odds);
        let mut eval_scores = Array1::from_elem(x_eval.nrows(), initial_log_odds);

        let mut rng = match config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let mut trees: Vec<RegressionTree> = Vec::new();
        let mut best_loss = f64::INFINITY;
        let mut best_round: usize = 0;

        for round in 0..config.max_rounds {
            // Weighted gradient of the log loss.
            let residuals: Array1<f64> = (0..n)
                .map(|i| weights[i] * (y_train[i] - sigmoid(train_scores[i])))
                .collect();

            let sample = subsample_indices(n, config.subsample, &mut rng);
            let tree = RegressionTree::fit(
                x_train,
                &residuals,
                &sample,
                config.max_depth,
                config.min_samples_leaf,
            )?;

            for i in 0..n {
                train_scores[i] += config.learning_rate * tree.predict_row(x_train.row(i));
            }
            for j in 0..x_eval.nrows() {
                eval_scores[j] += config.learning_rate * tree.predict_row(x_eval.row(j));
            }
            trees.push(tree);

            let eval_loss = log_loss(y_eval, &eval_scores);
            if eval_loss + 1e-9 < best_loss {
                best_loss = eval_loss;
                best_round = round;
            } else if round - best_round >= config.early_stopping_rounds {
                break;
            }
        }

        trees.truncate(best_round + 1);

        Ok(Self {
            config,
            trees,
            initial_log_odds,
        })
    }

    /// Number of boosting rounds kept after early stopping.
    pub fn n_rounds(&self) -> usize {
        self.trees.len()
    }

    /// Predicted positive-class probability per row.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        let mut scores = Array1::from_elem(x.nrows(), self.initial_log_odds);
        for tree in &self.trees {
            for i in 0..x.nrows() {
                scores[i] += self.config.learning_rate * tree.predict_row(x.row(i));
            }
        }
        scores.mapv(sigmoid)
    }

    /// Predicted positive-class probability for a single feature vector.
    pub fn predict_row_proba(&self, features: &[f64]) -> f64 {
        let row = ArrayView1::from(features);
        let score = self.initial_log_odds
            + self
                .trees
                .iter()
                .map(|t| self.config.learning_rate * t.predict_row(row))
                .sum::<f64>();
        sigmoid(score)
    }
}

fn subsample_indices(n: usize, ratio: f64, rng: &mut Xoshiro256PlusPlus) -> Vec<usize> {
    let sample_size = ((n as f64) * ratio).ceil().max(1.0) as usize;
    let mut indices: Vec<usize> = (0..n).collect();
    if sample_size >= n {
        return indices;
    }
    indices.shuffle(rng);
    indices.truncate(sample_size);
    indices.sort_unstable();
    indices
}

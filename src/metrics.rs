//! Evaluation metrics for binary classification

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Test-set metrics reported after a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl EvalMetrics {
    /// Compute metrics at a fixed decision threshold. A probability strictly
    /// above the threshold counts as positive. Zero-division in precision,
    /// recall, or F1 yields 0, not an error.
    pub fn at_threshold(y_true: &Array1<f64>, probs: &Array1<f64>, threshold: f64) -> Self {
        let n = y_true.len();
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut tn = 0usize;
        let mut fn_ = 0usize;

        for (&truth, &p) in y_true.iter().zip(probs.iter()) {
            let predicted = p > threshold;
            let actual = truth > 0.5;
            match (actual, predicted) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
        }

        let accuracy = if n > 0 {
            (tp + tn) as f64 / n as f64
        } else {
            0.0
        };
        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };
        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            precision,
            recall,
            f1_score,
        }
    }
}

/// Positive-class weighting factor computed from the training subset:
/// `negatives / max(positives, 1)`.
pub fn imbalance_weight(y: &Array1<f64>) -> f64 {
    let positives = y.iter().filter(|&&v| v > 0.5).count();
    let negatives = y.len() - positives;
    negatives as f64 / positives.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_metrics_at_threshold() {
        let y = array![1.0, 1.0, 0.0, 0.0];
        let probs = array![0.9, 0.2, 0.8, 0.1];
        let m = EvalMetrics::at_threshold(&y, &probs, 0.5);

        assert_eq!(m.accuracy, 0.5);
        assert_eq!(m.precision, 0.5); // 1 TP, 1 FP
        assert_eq!(m.recall, 0.5); // 1 TP, 1 FN
        assert!((m.f1_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_is_strict() {
        let y = array![1.0];
        let probs = array![0.3];
        // Exactly at the threshold counts as negative.
        let m = EvalMetrics::at_threshold(&y, &probs, 0.3);
        assert_eq!(m.recall, 0.0);
    }

    #[test]
    fn test_zero_division_yields_zero() {
        let y = array![0.0, 0.0];
        let probs = array![0.1, 0.2];
        let m = EvalMetrics::at_threshold(&y, &probs, 0.5);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1_score, 0.0);
        assert_eq!(m.accuracy, 1.0);
    }

    #[test]
    fn test_imbalance_weight() {
        let mut labels = vec![0.0; 950];
        labels.extend(vec![1.0; 50]);
        let y = Array1::from_vec(labels);
        assert_eq!(imbalance_weight(&y), 19.0);
    }

    #[test]
    fn test_imbalance_weight_without_positives() {
        let y = array![0.0, 0.0, 0.0];
        // max(positives, 1) guards the division.
        assert_eq!(imbalance_weight(&y), 3.0);
    }
}

//! Regression trees used as boosting base learners

use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// A depth-bounded regression tree fit by variance reduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
    max_depth: usize,
    min_samples_leaf: usize,
}

impl RegressionTree {
    /// Fit a tree to the given targets. Rows are addressed through `indices`
    /// so boosting rounds can subsample without copying the matrix.
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        max_depth: usize,
        min_samples_leaf: usize,
    ) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ServiceError::Data(format!(
                "target length {} does not match {} rows",
                y.len(),
                x.nrows()
            )));
        }
        if indices.is_empty() {
            return Err(ServiceError::Data("cannot fit a tree on zero rows".to_string()));
        }

        let builder = TreeBuilder {
            max_depth,
            min_samples_leaf,
        };
        let root = builder.build(x, y, indices, 0);

        Ok(Self {
            root,
            max_depth,
            min_samples_leaf,
        })
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        (0..x.nrows()).map(|i| self.predict_row(x.row(i))).collect()
    }

    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature_idx] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

struct TreeBuilder {
    max_depth: usize,
    min_samples_leaf: usize,
}

impl TreeBuilder {
    fn build(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize], depth: usize) -> TreeNode {
        let n = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n as f64;

        if depth >= self.max_depth || n < 2 * self.min_samples_leaf || n < 2 {
            return TreeNode::Leaf { value: mean };
        }

        let Some((feature_idx, threshold)) = self.best_split(x, y, indices) else {
            return TreeNode::Leaf { value: mean };
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature_idx]] <= threshold);

        if left_idx.len() < self.min_samples_leaf || right_idx.len() < self.min_samples_leaf {
            return TreeNode::Leaf { value: mean };
        }

        TreeNode::Split {
            feature_idx,
            threshold,
            left: Box::new(self.build(x, y, &left_idx, depth + 1)),
            right: Box::new(self.build(x, y, &right_idx, depth + 1)),
        }
    }

    /// Best (feature, threshold) by variance reduction, scanned in parallel
    /// across features. Returns None when no split improves on the parent.
    fn best_split(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len() as f64;
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_impurity = total_sq / n - (total_sum / n).powi(2);

        let candidates: Vec<Option<(usize, f64, f64)>> = (0..x.ncols())
            .into_par_iter()
            .map(|feature_idx| {
                let mut values: Vec<f64> =
                    indices.iter().map(|&i| x[[i, feature_idx]]).collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                values.dedup();

                let mut best_gain = 0.0f64;
                let mut best_threshold = 0.0f64;

                for window in values.windows(2) {
                    let threshold = (window[0] + window[1]) / 2.0;

                    let mut left_count = 0usize;
                    let mut left_sum = 0.0f64;
                    let mut left_sq = 0.0f64;

                    for &idx in indices {
                        if x[[idx, feature_idx]] <= threshold {
                            let yi = y[idx];
                            left_count += 1;
                            left_sum += yi;
                            left_sq += yi * yi;
                        }
                    }

                    let right_count = indices.len() - left_count;
                    if left_count < self.min_samples_leaf || right_count < self.min_samples_leaf {
                        continue;
                    }

                    let right_sum = total_sum - left_sum;
                    let right_sq = total_sq - left_sq;

                    let left_n = left_count as f64;
                    let right_n = right_count as f64;
                    let left_impurity = left_sq / left_n - (left_sum / left_n).powi(2);
                    let right_impurity = right_sq / right_n - (right_sum / right_n).powi(2);

                    let weighted = (left_n * left_impurity + right_n * right_impurity) / n;
                    let gain = parent_impurity - weighted;
                    if gain > best_gain {
                        best_gain = gain;
                        best_threshold = threshold;
                    }
                }

                if best_gain > 0.0 {
                    Some((feature_idx, best_threshold, best_gain))
                } else {
                    None
                }
            })
            .collect();

        candidates
            .into_iter()
            .flatten()
            .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(feature_idx, threshold, _)| (feature_idx, threshold))
    }
}

//! Gradient-boosted trees for binary pass/fail classification
//!
//! The fitting routine accepts a positive-class weight to counteract the
//! heavy imbalance in production-line outcomes, and stops boosting early
//! once held-out log-loss stops improving.

mod classifier;
mod tree;

pub use classifier::{BoostedClassifier, BoostingConfig};
pub use tree::RegressionTree;

//! Telemetry dataset access: loading, time-window selection, and cleaning
//! of windowed subsets into model-ready matrices.

pub mod loader;
pub mod preprocess;
pub mod window;

pub use loader::load_csv;
pub use preprocess::{feature_matrix, label_vector, numeric_feature_columns};
pub use window::{column_timestamps, parse_utc, TimeWindow};

//! Service configuration

/// Configuration for the prediction service, resolved from environment
/// variables with sensible local defaults.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Path to the processed telemetry CSV file.
    pub dataset_path: String,
    /// Directory holding the persisted model artifact pair.
    pub models_dir: String,
    /// Name of the timestamp column in the dataset.
    pub timestamp_column: String,
    /// Name of the binary outcome column.
    pub label_column: String,
    /// Name of the record id column, used for simulation output when present.
    pub id_column: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            dataset_path: std::env::var("DATASET_PATH")
                .unwrap_or_else(|_| "./data/processed_data.csv".to_string()),
            models_dir: std::env::var("MODELS_DIR").unwrap_or_else(|_| "./data".to_string()),
            timestamp_column: std::env::var("TIMESTAMP_COLUMN")
                .unwrap_or_else(|_| "synthetic_timestamp".to_string()),
            label_column: std::env::var("LABEL_COLUMN")
                .unwrap_or_else(|_| "Response".to_string()),
            id_column: std::env::var("ID_COLUMN").unwrap_or_else(|_| "Id".to_string()),
        }
    }
}

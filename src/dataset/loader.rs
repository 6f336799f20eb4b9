//! Telemetry dataset loading

use crate::error::{Result, ServiceError};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Load the telemetry CSV file into a DataFrame.
///
/// The timestamp column is left as a string and parsed per-row later; all
/// sensor columns are schema-inferred. Fails with `DatasetNotFound` when the
/// file is absent.
pub fn load_csv(path: &str) -> Result<DataFrame> {
    if !Path::new(path).exists() {
        return Err(ServiceError::DatasetNotFound(path.to_string()));
    }

    let file = File::open(path).map_err(|e| ServiceError::Data(e.to_string()))?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .with_chunk_size(10_000)
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| ServiceError::Data(e.to_string()))
}

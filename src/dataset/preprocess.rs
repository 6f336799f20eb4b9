//! Windowed-subset cleaning into model-ready matrices
//!
//! Missing numeric values become 0 and the label column is coerced to 0/1
//! with non-numeric or missing labels treated as 0. The coercion is lossy on
//! purpose: a malformed label counts as a negative outcome rather than
//! rejecting the row.

use ndarray::{Array1, Array2};
use polars::prelude::*;

use crate::error::{Result, ServiceError};

/// Ordered list of numeric columns in the dataset, label column excluded.
pub fn numeric_feature_columns(df: &DataFrame, label_column: &str) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
                    | DataType::Float32
                    | DataType::Float64
            )
        })
        .map(|col| col.name().to_string())
        .filter(|name| name != label_column)
        .collect()
}

/// Extract the named columns for the given rows into a row-major matrix.
/// Null and non-finite values become 0.
pub fn feature_matrix(df: &DataFrame, columns: &[String], rows: &[usize]) -> Result<Array2<f64>> {
    let col_data: Vec<Vec<f64>> = columns
        .iter()
        .map(|name| {
            let col = df
                .column(name)
                .map_err(|_| ServiceError::Data(format!("feature column '{name}' not found")))?;
            let cast = col
                .cast(&DataType::Float64)
                .map_err(|e| ServiceError::Data(e.to_string()))?;
            let ca = cast.f64().map_err(|e| ServiceError::Data(e.to_string()))?;
            Ok(rows
                .iter()
                .map(|&i| match ca.get(i) {
                    Some(v) if v.is_finite() => v,
                    _ => 0.0,
                })
                .collect())
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn(
        (rows.len(), columns.len()),
        |(r, c)| col_data[c][r],
    ))
}

/// Label column coerced to 0/1 for the given rows.
///
/// The cast is non-strict: unparseable values become null and then 0. A
/// dataset without the label column yields an all-zero vector, matching the
/// treatment of inference-only records.
pub fn label_vector(df: &DataFrame, label_column: &str, rows: &[usize]) -> Result<Array1<f64>> {
    let Ok(col) = df.column(label_column) else {
        return Ok(Array1::zeros(rows.len()));
    };

    let cast = col
        .cast(&DataType::Float64)
        .map_err(|e| ServiceError::Data(e.to_string()))?;
    let ca = cast.f64().map_err(|e| ServiceError::Data(e.to_string()))?;

    Ok(rows
        .iter()
        .map(|&i| match ca.get(i) {
            Some(v) if v.is_finite() && v != 0.0 => 1.0,
            _ => 0.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "synthetic_timestamp" => &["2025-08-06 00:00:00", "2025-08-07 00:00:00", "2025-08-08 00:00:00"],
            "s1" => &[Some(1.0), None, Some(3.0)],
            "s2" => &[10.0, 20.0, 30.0],
            "Response" => &[0i64, 1, 0]
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_columns_exclude_label_and_timestamp() {
        let df = sample_df();
        let cols = numeric_feature_columns(&df, "Response");
        assert_eq!(cols, vec!["s1".to_string(), "s2".to_string()]);
    }

    #[test]
    fn test_feature_matrix_fills_nulls_with_zero() {
        let df = sample_df();
        let cols = numeric_feature_columns(&df, "Response");
        let x = feature_matrix(&df, &cols, &[0, 1, 2]).unwrap();
        assert_eq!(x.shape(), &[3, 2]);
        assert_eq!(x[[1, 0]], 0.0); // null s1 -> 0
        assert_eq!(x[[2, 0]], 3.0);
        assert_eq!(x[[0, 1]], 10.0);
    }

    #[test]
    fn test_feature_matrix_respects_row_subset() {
        let df = sample_df();
        let cols = numeric_feature_columns(&df, "Response");
        let x = feature_matrix(&df, &cols, &[2]).unwrap();
        assert_eq!(x.shape(), &[1, 2]);
        assert_eq!(x[[0, 1]], 30.0);
    }

    #[test]
    fn test_label_vector_coercion() {
        let df = df!(
            "Response" => &["1", "garbage", "0"]
        )
        .unwrap();
        let y = label_vector(&df, "Response", &[0, 1, 2]).unwrap();
        // Non-numeric labels become 0, never an error.
        assert_eq!(y.to_vec(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_label_column_is_all_zero() {
        let df = df!("s1" => &[1.0, 2.0]).unwrap();
        let y = label_vector(&df, "Response", &[0, 1]).unwrap();
        assert_eq!(y.to_vec(), vec![0.0, 0.0]);
    }
}

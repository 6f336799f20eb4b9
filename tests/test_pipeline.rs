//! End-to-end pipeline tests
//!
//! Drives the full train -> predict -> simulate flow through
//! `PredictionService` against a small on-disk telemetry CSV.

use std::io::Write;

use linewatch::config::ServiceConfig;
use linewatch::error::ServiceError;
use linewatch::service::PredictionService;

/// Telemetry CSV with 30 August rows (train) and 12 September rows (test).
/// The failure label tracks `L3_S29_F3430` exceeding 30; row 5 of September
/// carries an empty sensor reading to exercise null handling.
fn write_dataset(dir: &std::path::Path) -> String {
    let path = dir.join("processed_data.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "Id,synthetic_timestamp,L3_S29_F3430,L3_S29_F3429,L3_S29_F3436,L0_S0_F0,Response"
    )
    .unwrap();

    for day in 1..=30 {
        let temp = 20.0 + (day % 15) as f64;
        let label = i32::from(temp > 30.0);
        writeln!(
            file,
            "{id},2025-08-{day:02} 08:00:00,{temp},1012.5,48.0,{aux},{label}",
            id = day,
            aux = (day * 3) % 7,
        )
        .unwrap();
    }
    for day in 1..=12 {
        let temp = 20.0 + (day % 15) as f64;
        let label = i32::from(temp > 30.0);
        if day == 5 {
            writeln!(
                file,
                "{id},2025-09-{day:02} 08:00:00,,1012.5,48.0,1,{label}",
                id = 100 + day,
            )
            .unwrap();
        } else {
            writeln!(
                file,
                "{id},2025-09-{day:02} 08:00:00,{temp},1012.5,48.0,1,{label}",
                id = 100 + day,
            )
            .unwrap();
        }
    }
    path.display().to_string()
}

fn service_in(dir: &std::path::Path) -> PredictionService {
    let config = ServiceConfig {
        dataset_path: write_dataset(dir),
        models_dir: dir.display().to_string(),
        ..Default::default()
    };
    PredictionService::new(config)
}

#[test]
fn test_train_then_predict_then_simulate() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());

    let metrics = service
        .train("2025-08-01", "2025-08-31", "2025-09-01", "2025-09-30")
        .unwrap();
    assert!(metrics.accuracy > 0.5, "accuracy was {}", metrics.accuracy);
    assert!(service.store().is_trained());

    // Single-record prediction against the persisted model.
    let mut record = serde_json::Map::new();
    record.insert("L3_S29_F3430".to_string(), serde_json::json!(34.0));
    record.insert("L3_S29_F3429".to_string(), serde_json::json!(1012.5));
    record.insert("L3_S29_F3436".to_string(), serde_json::json!(48.0));
    let result = service.predict(&record).unwrap();
    assert!(result.prediction == 0 || result.prediction == 1);
    let confidence = result.confidence.unwrap();
    assert!((0.0..=1.0).contains(&confidence));

    // Retrospective predictions over the test window.
    let rows = service.simulate("2025-09-01", "2025-09-30").unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0].id, 101);
    assert!(rows[0].timestamp.starts_with("2025-09-01"));

    // Sensor readings are echoed back; the row with the missing temperature
    // falls back to the display default.
    let present = &rows[0];
    assert_eq!(present.parameters.pressure, Some(1012.5));
    let missing = &rows[4];
    assert_eq!(missing.parameters.temperature, Some(25.0));
}

#[test]
fn test_predict_before_training_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());

    let record = serde_json::Map::new();
    let err = service.predict(&record).unwrap_err();
    assert!(matches!(err, ServiceError::ModelNotTrained));
}

#[test]
fn test_simulate_empty_window_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());

    service
        .train("2025-08-01", "2025-08-31", "2025-09-01", "2025-09-30")
        .unwrap();

    let err = service.simulate("2030-01-01", "2030-02-01").unwrap_err();
    assert!(matches!(err, ServiceError::EmptyWindow(_)));
}

#[test]
fn test_simulate_with_reversed_range_is_empty_window() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());

    service
        .train("2025-08-01", "2025-08-31", "2025-09-01", "2025-09-30")
        .unwrap();

    // End before start selects nothing.
    let err = service.simulate("2025-09-30", "2025-09-01").unwrap_err();
    assert!(matches!(err, ServiceError::EmptyWindow(_)));
}

#[test]
fn test_retraining_swaps_the_artifact_pair() {
    let dir = tempfile::tempdir().unwrap();
    let service = service_in(dir.path());

    service
        .train("2025-08-01", "2025-08-31", "2025-09-01", "2025-09-30")
        .unwrap();
    let first = service.store().load().unwrap();

    service
        .train("2025-08-01", "2025-08-15", "2025-09-01", "2025-09-30")
        .unwrap();
    let second = service.store().load().unwrap();

    // Same schema either way, but a fresh artifact instance.
    assert_eq!(first.schema.columns(), second.schema.columns());
    assert!(!std::sync::Arc::ptr_eq(&first, &second));
}

//! Application state shared across handlers

use crate::service::PredictionService;

pub struct AppState {
    pub service: PredictionService,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self { service }
    }
}

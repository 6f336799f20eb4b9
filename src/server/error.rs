//! Error-to-response mapping for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::ServiceError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Caller errors: bad dates, empty windows, missing prerequisites.
            ApiError::Service(
                e @ (ServiceError::InvalidTimeRange(_)
                | ServiceError::EmptyWindow(_)
                | ServiceError::DatasetNotFound(_)
                | ServiceError::ModelNotTrained),
            ) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Service(e) => {
                tracing::error!(detail = %e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

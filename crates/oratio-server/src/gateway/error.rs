use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use oratio::{ScoringError, ZonError};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("scoring failed")]
    ScoringFailed(#[from] ScoringError),

    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] ZonError),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::ScoringFailed(e) => {
                tracing::error!(
                    error = %e,
                    initialization = e.is_initialization_failure(),
                    "Scoring failed"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::SerializationFailed(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

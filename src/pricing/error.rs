// Errors raised by price resolution, order limit checks and the rule store

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    /// Negative or non-numeric price, quantity below one, negative order total
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Arithmetic overflow on pathological inputs
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// Rule store access failure
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl From<validator::ValidationErrors> for PricingError {
    fn from(err: validator::ValidationErrors) -> Self {
        PricingError::Validation(err.to_string())
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            PricingError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation error"),
            PricingError::Calculation(_) => (StatusCode::BAD_REQUEST, "Calculation error"),
            PricingError::Store(e) => {
                tracing::error!("Rule store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let details = match &self {
            PricingError::Store(_) => "The pricing service is temporarily unavailable".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "details": details,
        }));

        (status, body).into_response()
    }
}

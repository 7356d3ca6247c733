// Error handling for the admin API
// Every admin handler returns Result<T, ApiError>

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::pricing::PricingError;

/// Main error type for the admin API.
///
/// Each variant maps to one HTTP status code. Database and internal errors are
/// logged in full and reported to the client with a generic message.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failures (400)
    ValidationError(validator::ValidationErrors),

    /// Malformed or semantically invalid request (400)
    BadRequest(String),

    /// Resource not found by id (404)
    NotFound { resource: String, id: String },

    /// Duplicate resource or disallowed state change (409)
    Conflict { message: String },

    /// Database operation errors (500)
    DatabaseError(sqlx::Error),

    /// Internal server errors (500)
    InternalError(String),

    /// Authentication failures (401)
    Unauthorized(String),
}

/// JSON body for every error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code, e.g. "VALIDATION_ERROR"
    pub error_code: String,

    pub message: String,

    /// Field-level validation errors, when any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict {
            message: message.into(),
        }
    }

    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let body = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse::new(
                    "VALIDATION_ERROR",
                    "Request validation failed",
                    Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                )
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                ErrorResponse::new("VALIDATION_ERROR", message.clone(), None)
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id), None)
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone(), None)
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                ErrorResponse::new("DATABASE_ERROR", "A database error occurred", None)
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred", None)
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);
                ErrorResponse::new("UNAUTHORIZED", message.clone(), None)
            }
        };
        (status, body)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ValidationError(errors) => write!(f, "validation failed: {}", errors),
            ApiError::BadRequest(message) => write!(f, "bad request: {}", message),
            ApiError::NotFound { resource, id } => write!(f, "{} with id {} not found", resource, id),
            ApiError::Conflict { message } => write!(f, "conflict: {}", message),
            ApiError::DatabaseError(e) => write!(f, "database error: {}", e),
            ApiError::InternalError(message) => write!(f, "internal error: {}", message),
            ApiError::Unauthorized(message) => write!(f, "unauthorized: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

impl From<PricingError> for ApiError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::Validation(message) | PricingError::Calculation(message) => {
                ApiError::BadRequest(message)
            }
            PricingError::Store(e) => ApiError::DatabaseError(e),
        }
    }
}

/// Map unique-constraint violations to a 409 with the given message.
pub fn conflict_on_unique(error: sqlx::Error, message: &str) -> ApiError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::conflict(message),
        _ => ApiError::DatabaseError(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("Customer", 3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::conflict("dup").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::Unauthorized("no".into()).status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_database_error_hides_details() {
        let (status, body) = ApiError::DatabaseError(sqlx::Error::RowNotFound).to_error_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error_code, "DATABASE_ERROR");
        assert_eq!(body.message, "A database error occurred");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_not_found_message() {
        let (_, body) = ApiError::not_found("Quote request", 42).to_error_response();
        assert_eq!(body.message, "Quote request with id 42 not found");
    }

    #[test]
    fn test_pricing_errors_map_to_client_or_server() {
        let api: ApiError = PricingError::Validation("bad price".into()).into();
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);

        let api: ApiError = PricingError::Store(sqlx::Error::PoolTimedOut).into();
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let api = conflict_on_unique(sqlx::Error::RowNotFound, "duplicate");
        assert!(matches!(api, ApiError::DatabaseError(_)));
    }
}

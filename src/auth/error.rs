// Admin session verification errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// Token verified but its shop claims are inconsistent or malformed
    #[error("Token is not valid for this shop: {0}")]
    InvalidShop(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => warn!("Missing token in admin request"),
            AuthError::InvalidToken => warn!("Invalid session token"),
            AuthError::ExpiredToken => warn!("Expired session token"),
            AuthError::InvalidShop(shop) => warn!("Session token for invalid shop: {}", shop),
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}

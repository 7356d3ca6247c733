// Admin session extractor for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::debug;

use crate::auth::{error::AuthError, token::SessionTokenVerifier, token::ShopSession};

#[async_trait]
impl<S> FromRequestParts<S> for ShopSession
where
    S: Send + Sync,
    Arc<SessionTokenVerifier>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let verifier = Arc::<SessionTokenVerifier>::from_ref(state);
        let session = verifier.verify(token.trim())?;
        debug!("Admin request for shop {}", session.shop);

        Ok(session)
    }
}

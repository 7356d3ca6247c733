// HTTP handlers for quote requests

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::ShopSession;
use crate::error::ApiError;
use crate::quotes::models::{
    CreateQuoteRequest, QuoteRequest, QuoteSubmittedResponse, RespondQuoteRequest,
    UpdateQuoteStatusRequest,
};
use crate::quotes::repository::QuoteRepository;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Submit a quote request from the storefront
#[utoipa::path(
    post,
    path = "/api/storefront/quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote request stored", body = QuoteSubmittedResponse),
        (status = 400, description = "Invalid quote request")
    ),
    tag = "storefront"
)]
pub async fn create_quote_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteSubmittedResponse>), ApiError> {
    let quote = QuoteRepository::new(state.db.clone()).create(&request).await?;
    info!(
        "Quote request {} from {} ({} lines)",
        quote.id,
        quote.customer_email,
        quote.products.len()
    );
    Ok((StatusCode::CREATED, Json(QuoteSubmittedResponse::new(quote.id))))
}

/// List quote requests
#[utoipa::path(
    get,
    path = "/api/quotes",
    responses(
        (status = 200, description = "Quote requests, newest first", body = Vec<QuoteRequest>),
        (status = 401, description = "Missing or invalid session token")
    ),
    tag = "quotes"
)]
pub async fn list_quotes_handler(
    State(state): State<AppState>,
    _session: ShopSession,
) -> Result<Json<Vec<QuoteRequest>>, ApiError> {
    let quotes = QuoteRepository::new(state.db.clone()).list().await?;
    Ok(Json(quotes))
}

/// Get a quote request by id
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    params(("id" = i32, Path, description = "Quote request id")),
    responses(
        (status = 200, description = "Quote request", body = QuoteRequest),
        (status = 404, description = "Quote request not found")
    ),
    tag = "quotes"
)]
pub async fn get_quote_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<QuoteRequest>, ApiError> {
    let quote = QuoteRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Quote request", id))?;
    Ok(Json(quote))
}

/// Answer a quote request with an offer
#[utoipa::path(
    post,
    path = "/api/quotes/{id}/respond",
    params(("id" = i32, Path, description = "Quote request id")),
    request_body = RespondQuoteRequest,
    responses(
        (status = 200, description = "Quote answered", body = QuoteRequest),
        (status = 404, description = "Quote request not found")
    ),
    tag = "quotes"
)]
pub async fn respond_quote_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<RespondQuoteRequest>,
) -> Result<Json<QuoteRequest>, ApiError> {
    let quote = QuoteRepository::new(state.db.clone())
        .respond(id, &request, &session.shop)
        .await?
        .ok_or_else(|| ApiError::not_found("Quote request", id))?;
    info!("Shop {} responded to quote request {}", session.shop, id);
    Ok(Json(quote))
}

/// Set a quote request's status
#[utoipa::path(
    patch,
    path = "/api/quotes/{id}/status",
    params(("id" = i32, Path, description = "Quote request id")),
    request_body = UpdateQuoteStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = QuoteRequest),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Quote request not found")
    ),
    tag = "quotes"
)]
pub async fn update_quote_status_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateQuoteStatusRequest>,
) -> Result<Json<QuoteRequest>, ApiError> {
    let quote = QuoteRepository::new(state.db.clone())
        .set_status(id, request.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Quote request", id))?;
    info!("Shop {} set quote request {} to {}", session.shop, id, request.status);
    Ok(Json(quote))
}

/// Delete a quote request
#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    params(("id" = i32, Path, description = "Quote request id")),
    responses(
        (status = 204, description = "Quote request deleted"),
        (status = 404, description = "Quote request not found")
    ),
    tag = "quotes"
)]
pub async fn delete_quote_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !QuoteRepository::new(state.db.clone()).delete(id).await? {
        return Err(ApiError::not_found("Quote request", id));
    }
    info!("Shop {} deleted quote request {}", session.shop, id);
    Ok(StatusCode::NO_CONTENT)
}

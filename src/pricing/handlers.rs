// HTTP handlers for pricing rule administration

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::ShopSession;
use crate::error::ApiError;
use crate::pricing::models::{PricingRule, PricingRuleRequest, ToggleRuleResponse};
use crate::pricing::repository::PricingRuleRepository;
use crate::storefront::models::{PriceCalculationRequest, PriceCalculationResponse};
use crate::validation::ValidatedJson;
use crate::AppState;

/// List all pricing rules
#[utoipa::path(
    get,
    path = "/api/pricing",
    responses(
        (status = 200, description = "All pricing rules, highest priority first", body = Vec<PricingRule>),
        (status = 401, description = "Missing or invalid session token")
    ),
    tag = "pricing"
)]
pub async fn list_rules_handler(
    State(state): State<AppState>,
    _session: ShopSession,
) -> Result<Json<Vec<PricingRule>>, ApiError> {
    let rules = PricingRuleRepository::new(state.db.clone()).list().await?;
    Ok(Json(rules))
}

/// Get a pricing rule by id
#[utoipa::path(
    get,
    path = "/api/pricing/{id}",
    params(("id" = i32, Path, description = "Pricing rule id")),
    responses(
        (status = 200, description = "Pricing rule", body = PricingRule),
        (status = 404, description = "Rule not found")
    ),
    tag = "pricing"
)]
pub async fn get_rule_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<PricingRule>, ApiError> {
    let rule = PricingRuleRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pricing rule", id))?;
    Ok(Json(rule))
}

/// Create a pricing rule
#[utoipa::path(
    post,
    path = "/api/pricing",
    request_body = PricingRuleRequest,
    responses(
        (status = 201, description = "Rule created", body = PricingRule),
        (status = 400, description = "Invalid rule")
    ),
    tag = "pricing"
)]
pub async fn create_rule_handler(
    State(state): State<AppState>,
    session: ShopSession,
    ValidatedJson(request): ValidatedJson<PricingRuleRequest>,
) -> Result<(StatusCode, Json<PricingRule>), ApiError> {
    let rule = PricingRuleRepository::new(state.db.clone())
        .create(&request)
        .await?;
    state.rule_store().invalidate_rules().await;

    info!("Shop {} created pricing rule {} ({})", session.shop, rule.id, rule.name);
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Replace a pricing rule
#[utoipa::path(
    put,
    path = "/api/pricing/{id}",
    params(("id" = i32, Path, description = "Pricing rule id")),
    request_body = PricingRuleRequest,
    responses(
        (status = 200, description = "Rule updated", body = PricingRule),
        (status = 400, description = "Invalid rule"),
        (status = 404, description = "Rule not found")
    ),
    tag = "pricing"
)]
pub async fn update_rule_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<PricingRuleRequest>,
) -> Result<Json<PricingRule>, ApiError> {
    let rule = PricingRuleRepository::new(state.db.clone())
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Pricing rule", id))?;
    state.rule_store().invalidate_rules().await;

    info!("Shop {} updated pricing rule {}", session.shop, id);
    Ok(Json(rule))
}

/// Delete a pricing rule
#[utoipa::path(
    delete,
    path = "/api/pricing/{id}",
    params(("id" = i32, Path, description = "Pricing rule id")),
    responses(
        (status = 204, description = "Rule deleted"),
        (status = 404, description = "Rule not found")
    ),
    tag = "pricing"
)]
pub async fn delete_rule_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = PricingRuleRepository::new(state.db.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::not_found("Pricing rule", id));
    }
    state.rule_store().invalidate_rules().await;

    info!("Shop {} deleted pricing rule {}", session.shop, id);
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a rule between active and inactive
#[utoipa::path(
    patch,
    path = "/api/pricing/{id}/toggle",
    params(("id" = i32, Path, description = "Pricing rule id")),
    responses(
        (status = 200, description = "New active flag", body = ToggleRuleResponse),
        (status = 404, description = "Rule not found")
    ),
    tag = "pricing"
)]
pub async fn toggle_rule_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<ToggleRuleResponse>, ApiError> {
    let active = PricingRuleRepository::new(state.db.clone())
        .toggle(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pricing rule", id))?;
    state.rule_store().invalidate_rules().await;

    info!("Shop {} set pricing rule {} active={}", session.shop, id, active);
    Ok(Json(ToggleRuleResponse { id, active }))
}

/// Preview the price a customer would pay
#[utoipa::path(
    post,
    path = "/api/pricing/calculate",
    request_body = PriceCalculationRequest,
    responses(
        (status = 200, description = "Resolved price", body = PriceCalculationResponse),
        (status = 400, description = "Invalid price or quantity")
    ),
    tag = "pricing"
)]
pub async fn preview_price_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    ValidatedJson(request): ValidatedJson<PriceCalculationRequest>,
) -> Result<Json<PriceCalculationResponse>, ApiError> {
    let response = state.pricing.calculate_price(&request).await?;
    Ok(Json(response))
}

// HTTP handlers for the public storefront pricing endpoints
//
// Generic over the rule store so the same handlers serve PostgreSQL in
// production and the in-memory store in tests.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::debug;

use crate::pricing::{PricingError, RuleStore};
use crate::storefront::models::{
    CartValidationRequest, CartValidationResponse, CustomerStatusQuery, CustomerStatusResponse,
    PriceCalculationRequest, PriceCalculationResponse,
};
use crate::storefront::service::StorefrontService;
use crate::validation::ValidatedJson;

/// Handler for POST /api/storefront/calculate-price
pub async fn calculate_price_handler<S: RuleStore>(
    State(service): State<Arc<StorefrontService<S>>>,
    ValidatedJson(request): ValidatedJson<PriceCalculationRequest>,
) -> Result<Json<PriceCalculationResponse>, PricingError> {
    debug!(
        "Price request: product {:?}, variant {:?}, quantity {:?}",
        request.product_id, request.variant_id, request.quantity
    );
    let response = service.calculate_price(&request).await?;
    Ok(Json(response))
}

/// Handler for POST /api/storefront/validate-cart
pub async fn validate_cart_handler<S: RuleStore>(
    State(service): State<Arc<StorefrontService<S>>>,
    ValidatedJson(request): ValidatedJson<CartValidationRequest>,
) -> Result<Json<CartValidationResponse>, PricingError> {
    let response = service.validate_cart(&request).await?;
    Ok(Json(response))
}

/// Handler for GET /api/storefront/customer-status?email=
pub async fn customer_status_handler<S: RuleStore>(
    State(service): State<Arc<StorefrontService<S>>>,
    Query(query): Query<CustomerStatusQuery>,
) -> Result<Json<CustomerStatusResponse>, PricingError> {
    let response = service.customer_status(query.email.as_deref()).await?;
    Ok(Json(response))
}

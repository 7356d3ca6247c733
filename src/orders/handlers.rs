// HTTP handlers for wholesale order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::ShopSession;
use crate::customers::CustomerRepository;
use crate::error::ApiError;
use crate::orders::{
    ApprovalStatus, B2bOrder, OrderListItem, OrderService, OrderValidationResponse,
    OrdersRepository, RecordOrderRequest, RejectOrderRequest,
};
use crate::settings::{SettingsRepository, APPROVAL_REQUIRED};
use crate::storefront::models::CartValidationRequest;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Query parameters for the order list
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<ApprovalStatus>,
}

fn order_service(state: &AppState) -> OrderService {
    OrderService::new(
        OrdersRepository::new(state.db.clone()),
        CustomerRepository::new(state.db.clone()),
        SettingsRepository::new(state.db.clone()),
    )
}

/// List wholesale orders
#[utoipa::path(
    get,
    path = "/api/orders",
    params(("status" = Option<String>, Query, description = "pending, approved or rejected")),
    responses(
        (status = 200, description = "Orders, newest first", body = Vec<OrderListItem>),
        (status = 401, description = "Missing or invalid session token")
    ),
    tag = "orders"
)]
pub async fn list_orders_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderListItem>>, ApiError> {
    let orders = OrdersRepository::new(state.db.clone())
        .list(query.status)
        .await?;
    Ok(Json(orders))
}

/// List orders awaiting approval
#[utoipa::path(
    get,
    path = "/api/orders/pending",
    responses(
        (status = 200, description = "Pending orders", body = Vec<OrderListItem>)
    ),
    tag = "orders"
)]
pub async fn list_pending_orders_handler(
    State(state): State<AppState>,
    _session: ShopSession,
) -> Result<Json<Vec<OrderListItem>>, ApiError> {
    let orders = OrdersRepository::new(state.db.clone())
        .list(Some(ApprovalStatus::Pending))
        .await?;
    Ok(Json(orders))
}

/// Get an order with its customer's email and company
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = OrderListItem),
        (status = 404, description = "Order not found")
    ),
    tag = "orders"
)]
pub async fn get_order_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<OrderListItem>, ApiError> {
    let order = OrdersRepository::new(state.db.clone())
        .find_with_customer(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", id))?;
    Ok(Json(order))
}

/// Record a wholesale order for approval
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = RecordOrderRequest,
    responses(
        (status = 201, description = "Order recorded", body = B2bOrder),
        (status = 400, description = "Invalid order"),
        (status = 404, description = "Customer not found")
    ),
    tag = "orders"
)]
pub async fn record_order_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    ValidatedJson(request): ValidatedJson<RecordOrderRequest>,
) -> Result<(StatusCode, Json<B2bOrder>), ApiError> {
    let order = order_service(&state).record_order(&request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Approve a pending order
#[utoipa::path(
    post,
    path = "/api/orders/{id}/approve",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order approved", body = B2bOrder),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already rejected")
    ),
    tag = "orders"
)]
pub async fn approve_order_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<B2bOrder>, ApiError> {
    let order = order_service(&state).approve(id, &session.shop).await?;
    Ok(Json(order))
}

/// Reject a pending order
#[utoipa::path(
    post,
    path = "/api/orders/{id}/reject",
    params(("id" = i32, Path, description = "Order id")),
    request_body = RejectOrderRequest,
    responses(
        (status = 200, description = "Order rejected", body = B2bOrder),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order already approved")
    ),
    tag = "orders"
)]
pub async fn reject_order_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    body: Option<Json<RejectOrderRequest>>,
) -> Result<Json<B2bOrder>, ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let order = order_service(&state)
        .reject(id, &session.shop, &request.reason_or_default())
        .await?;
    Ok(Json(order))
}

/// Check a cart against the customer's limits and the approval setting
#[utoipa::path(
    post,
    path = "/api/orders/validate",
    request_body = CartValidationRequest,
    responses(
        (status = 200, description = "Validation result", body = OrderValidationResponse),
        (status = 400, description = "Invalid amount")
    ),
    tag = "orders"
)]
pub async fn validate_order_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    ValidatedJson(request): ValidatedJson<CartValidationRequest>,
) -> Result<Json<OrderValidationResponse>, ApiError> {
    let cart = state.pricing.validate_cart(&request).await?;
    let requires_approval = SettingsRepository::new(state.db.clone())
        .flag(APPROVAL_REQUIRED)
        .await?;
    Ok(Json(OrderValidationResponse {
        cart,
        requires_approval,
    }))
}

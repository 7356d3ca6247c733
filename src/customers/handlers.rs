// HTTP handlers for wholesale customer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::ShopSession;
use crate::customers::models::{
    ApproveCustomerRequest, AssignGroupRequest, Customer, CustomerListQuery, CustomerView,
    RegisterCustomerRequest, RegistrationResponse, UpdateTermsRequest,
};
use crate::customers::repository::CustomerRepository;
use crate::customers::service::CustomerService;
use crate::error::ApiError;
use crate::groups::GroupRepository;
use crate::validation::ValidatedJson;
use crate::AppState;

fn customer_service(state: &AppState) -> CustomerService {
    CustomerService::new(
        CustomerRepository::new(state.db.clone()),
        GroupRepository::new(state.db.clone()),
    )
}

/// List wholesale customers
#[utoipa::path(
    get,
    path = "/api/customers",
    params(("status" = Option<String>, Query, description = "pending, approved or rejected")),
    responses(
        (status = 200, description = "Customers, newest first", body = Vec<CustomerView>),
        (status = 401, description = "Missing or invalid session token")
    ),
    tag = "customers"
)]
pub async fn list_customers_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let customers = CustomerRepository::new(state.db.clone())
        .list(query.status)
        .await?
        .into_iter()
        .map(CustomerView::from)
        .collect();
    Ok(Json(customers))
}

/// Get a customer by id
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerView),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn get_customer_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<CustomerView>, ApiError> {
    let customer = CustomerRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", id))?;
    Ok(Json(customer.into()))
}

/// Approve a customer, optionally assigning a group
#[utoipa::path(
    post,
    path = "/api/customers/{id}/approve",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = ApproveCustomerRequest,
    responses(
        (status = 200, description = "Customer approved", body = Customer),
        (status = 404, description = "Customer or group not found")
    ),
    tag = "customers"
)]
pub async fn approve_customer_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    body: Option<Json<ApproveCustomerRequest>>,
) -> Result<Json<Customer>, ApiError> {
    let group_id = body.and_then(|Json(request)| request.group_id);
    let customer = customer_service(&state)
        .approve(id, group_id, &session.shop)
        .await?;
    Ok(Json(customer))
}

/// Reject a customer
#[utoipa::path(
    post,
    path = "/api/customers/{id}/reject",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer rejected", body = Customer),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn reject_customer_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<Customer>, ApiError> {
    let customer = customer_service(&state).reject(id, &session.shop).await?;
    Ok(Json(customer))
}

/// Assign or remove a customer's group
#[utoipa::path(
    put,
    path = "/api/customers/{id}/group",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = AssignGroupRequest,
    responses(
        (status = 200, description = "Group assigned and terms copied", body = Customer),
        (status = 404, description = "Customer or group not found")
    ),
    tag = "customers"
)]
pub async fn assign_group_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<AssignGroupRequest>,
) -> Result<Json<Customer>, ApiError> {
    let customer = customer_service(&state)
        .assign_group(id, request.group_id, &session.shop)
        .await?;
    Ok(Json(customer))
}

/// Override a customer's commercial terms
#[utoipa::path(
    patch,
    path = "/api/customers/{id}/terms",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = UpdateTermsRequest,
    responses(
        (status = 200, description = "Terms updated", body = Customer),
        (status = 400, description = "Invalid terms"),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn update_terms_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateTermsRequest>,
) -> Result<Json<Customer>, ApiError> {
    let customer = CustomerRepository::new(state.db.clone())
        .update_terms(id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", id))?;
    info!("Shop {} updated terms of customer {}", session.shop, id);
    Ok(Json(customer))
}

/// Submit a wholesale application from the storefront
#[utoipa::path(
    post,
    path = "/api/storefront/register",
    request_body = RegisterCustomerRequest,
    responses(
        (status = 201, description = "Application received", body = RegistrationResponse),
        (status = 400, description = "Invalid form"),
        (status = 409, description = "Email already registered")
    ),
    tag = "storefront"
)]
pub async fn register_customer_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterCustomerRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let customer = CustomerRepository::new(state.db.clone())
        .register(&request)
        .await?;
    info!("Wholesale application {} from {}", customer.id, customer.email);
    Ok((StatusCode::CREATED, Json(RegistrationResponse::from(&customer))))
}

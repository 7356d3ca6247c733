// HTTP handlers for customer group endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::ShopSession;
use crate::error::ApiError;
use crate::groups::models::{
    CreateGroupRequest, CustomerGroup, CustomerGroupSummary, UpdateGroupRequest,
};
use crate::groups::repository::GroupRepository;
use crate::validation::ValidatedJson;
use crate::AppState;

/// List customer groups
#[utoipa::path(
    get,
    path = "/api/groups",
    responses(
        (status = 200, description = "Groups with customer counts", body = Vec<CustomerGroupSummary>),
        (status = 401, description = "Missing or invalid session token")
    ),
    tag = "groups"
)]
pub async fn list_groups_handler(
    State(state): State<AppState>,
    _session: ShopSession,
) -> Result<Json<Vec<CustomerGroupSummary>>, ApiError> {
    let groups = GroupRepository::new(state.db.clone()).list().await?;
    Ok(Json(groups))
}

/// Get a customer group by id
#[utoipa::path(
    get,
    path = "/api/groups/{id}",
    params(("id" = i32, Path, description = "Customer group id")),
    responses(
        (status = 200, description = "Customer group", body = CustomerGroup),
        (status = 404, description = "Group not found")
    ),
    tag = "groups"
)]
pub async fn get_group_handler(
    State(state): State<AppState>,
    _session: ShopSession,
    Path(id): Path<i32>,
) -> Result<Json<CustomerGroup>, ApiError> {
    let group = GroupRepository::new(state.db.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer group", id))?;
    Ok(Json(group))
}

/// Create a customer group
#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = CustomerGroup),
        (status = 400, description = "Invalid group"),
        (status = 409, description = "Group name already exists")
    ),
    tag = "groups"
)]
pub async fn create_group_handler(
    State(state): State<AppState>,
    session: ShopSession,
    ValidatedJson(request): ValidatedJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CustomerGroup>), ApiError> {
    let group = GroupRepository::new(state.db.clone()).create(&request).await?;
    info!("Shop {} created customer group {} ({})", session.shop, group.id, group.name);
    Ok((StatusCode::CREATED, Json(group)))
}

/// Update a customer group
///
/// Customers already in the group keep the terms copied at assignment.
#[utoipa::path(
    put,
    path = "/api/groups/{id}",
    params(("id" = i32, Path, description = "Customer group id")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group updated", body = CustomerGroup),
        (status = 404, description = "Group not found"),
        (status = 409, description = "Group name already exists")
    ),
    tag = "groups"
)]
pub async fn update_group_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateGroupRequest>,
) -> Result<Json<CustomerGroup>, ApiError> {
    let group = GroupRepository::new(state.db.clone())
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer group", id))?;
    info!("Shop {} updated customer group {}", session.shop, id);
    Ok(Json(group))
}

/// Delete a customer group
#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    params(("id" = i32, Path, description = "Customer group id")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found")
    ),
    tag = "groups"
)]
pub async fn delete_group_handler(
    State(state): State<AppState>,
    session: ShopSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    if !GroupRepository::new(state.db.clone()).delete(id).await? {
        return Err(ApiError::not_found("Customer group", id));
    }
    info!("Shop {} deleted customer group {}", session.shop, id);
    Ok(StatusCode::NO_CONTENT)
}

use axum::{extract::State, Json};
use tracing::info;

use crate::auth::ShopSession;
use crate::error::ApiError;
use crate::settings::models::{AppSettings, UpdateSettingsRequest};
use crate::settings::repository::SettingsRepository;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Get store-wide settings
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Current settings", body = AppSettings),
        (status = 401, description = "Missing or invalid session token")
    ),
    tag = "settings"
)]
pub async fn get_settings_handler(
    State(state): State<AppState>,
    _session: ShopSession,
) -> Result<Json<AppSettings>, ApiError> {
    let settings = SettingsRepository::new(state.db.clone()).load().await?;
    Ok(Json(settings))
}

/// Update store-wide settings
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Updated settings", body = AppSettings),
        (status = 400, description = "Invalid settings")
    ),
    tag = "settings"
)]
pub async fn update_settings_handler(
    State(state): State<AppState>,
    session: ShopSession,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<AppSettings>, ApiError> {
    let settings = SettingsRepository::new(state.db.clone())
        .update(&request)
        .await?;
    info!("Shop {} updated settings", session.shop);
    Ok(Json(settings))
}

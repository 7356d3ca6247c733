// Store-wide settings kept as key/value rows

pub mod handlers;
pub mod models;
pub mod repository;

use axum::{routing::get, Router};

use crate::AppState;

pub use handlers::*;
pub use models::*;
pub use repository::SettingsRepository;

/// Admin routes, nested under `/api/settings`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_settings_handler).put(update_settings_handler))
}

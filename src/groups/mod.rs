// Customer groups: wholesale tiers with default terms

pub mod handlers;
pub mod models;
pub mod repository;

use axum::{routing::get, Router};

use crate::AppState;

pub use handlers::*;
pub use models::*;
pub use repository::GroupRepository;

/// Admin routes, nested under `/api/groups`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups_handler).post(create_group_handler))
        .route(
            "/:id",
            get(get_group_handler)
                .put(update_group_handler)
                .delete(delete_group_handler),
        )
}

// Quote requests for volume pricing

pub mod handlers;
pub mod models;
pub mod repository;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::AppState;

pub use handlers::*;
pub use models::*;
pub use repository::QuoteRepository;

/// Admin routes, nested under `/api/quotes`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes_handler))
        .route("/:id", get(get_quote_handler).delete(delete_quote_handler))
        .route("/:id/respond", post(respond_quote_handler))
        .route("/:id/status", patch(update_quote_status_handler))
}

/// Public submission route, merged into `/api/storefront`.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/quotes", post(create_quote_handler))
}

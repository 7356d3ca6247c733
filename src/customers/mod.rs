// Wholesale customers: registration, approval and per-customer terms

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::AppState;

pub use handlers::*;
pub use models::*;
pub use repository::CustomerRepository;
pub use service::CustomerService;

/// Admin routes, nested under `/api/customers`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers_handler))
        .route("/:id", get(get_customer_handler))
        .route("/:id/approve", post(approve_customer_handler))
        .route("/:id/reject", post(reject_customer_handler))
        .route("/:id/group", put(assign_group_handler))
        .route("/:id/terms", patch(update_terms_handler))
}

/// Public registration route, merged into `/api/storefront`.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/register", post(register_customer_handler))
}

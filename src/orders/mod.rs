// Wholesale orders and their approval workflow

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod status_machine;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use handlers::*;
pub use models::*;
pub use repository::OrdersRepository;
pub use service::OrderService;
pub use status_machine::ApprovalMachine;

/// Admin routes, nested under `/api/orders`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders_handler).post(record_order_handler))
        .route("/pending", get(list_pending_orders_handler))
        .route("/validate", post(validate_order_handler))
        .route("/:id", get(get_order_handler))
        .route("/:id/approve", post(approve_order_handler))
        .route("/:id/reject", post(reject_order_handler))
}

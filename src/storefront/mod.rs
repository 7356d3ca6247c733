// Storefront-facing pricing: price lookups, cart checks, customer status

pub mod handlers;
pub mod models;
pub mod service;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pricing::RuleStore;

pub use handlers::*;
pub use models::*;
pub use service::StorefrontService;

/// Public pricing routes, nested under `/api/storefront`.
pub fn routes<S: RuleStore>() -> Router<Arc<StorefrontService<S>>> {
    Router::new()
        .route("/calculate-price", post(calculate_price_handler::<S>))
        .route("/validate-cart", post(validate_cart_handler::<S>))
        .route("/customer-status", get(customer_status_handler::<S>))
}

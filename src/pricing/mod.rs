// Wholesale pricing
// Rule model, price resolution, order limits, the rule store and rule administration

pub mod error;
pub mod handlers;
pub mod models;
pub mod order_limits;
pub mod repository;
pub mod resolver;
pub mod store;
pub mod types;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::AppState;

pub use error::{PricingError, PricingResult};
pub use handlers::*;
pub use models::{PricingRule, PricingRuleRequest, ToggleRuleResponse};
pub use order_limits::{validate_order, OrderLimitCheck};
pub use repository::PricingRuleRepository;
pub use resolver::{resolve_price, round_currency, PriceResolution, BASELINE_RULE_NAME};
pub use store::{PgRuleStore, RuleStore};
pub use types::{AppliesTo, RuleType};

/// Admin routes, nested under `/api/pricing`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rules_handler).post(create_rule_handler))
        .route("/calculate", post(preview_price_handler))
        .route(
            "/:id",
            get(get_rule_handler)
                .put(update_rule_handler)
                .delete(delete_rule_handler),
        )
        .route("/:id/toggle", patch(toggle_rule_handler))
}

// Shopify B2B wholesale backend
//
// Public storefront endpoints price catalog lines and validate carts for
// approved wholesale customers. Admin endpoints, authenticated with Shopify
// session tokens, manage customers, groups, pricing rules, orders, quotes and
// settings.

pub mod auth;
pub mod config;
pub mod customers;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod groups;
pub mod orders;
pub mod pricing;
pub mod quotes;
pub mod settings;
pub mod storefront;
pub mod validation;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{extract::FromRef, response::Json, routing::get, Router};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::SessionTokenVerifier;
use config::Config;
use pricing::PgRuleStore;
use storefront::StorefrontService;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        customers::handlers::list_customers_handler,
        customers::handlers::get_customer_handler,
        customers::handlers::approve_customer_handler,
        customers::handlers::reject_customer_handler,
        customers::handlers::assign_group_handler,
        customers::handlers::update_terms_handler,
        customers::handlers::register_customer_handler,
        groups::handlers::list_groups_handler,
        groups::handlers::get_group_handler,
        groups::handlers::create_group_handler,
        groups::handlers::update_group_handler,
        groups::handlers::delete_group_handler,
        pricing::handlers::list_rules_handler,
        pricing::handlers::get_rule_handler,
        pricing::handlers::create_rule_handler,
        pricing::handlers::update_rule_handler,
        pricing::handlers::delete_rule_handler,
        pricing::handlers::toggle_rule_handler,
        pricing::handlers::preview_price_handler,
        orders::handlers::list_orders_handler,
        orders::handlers::list_pending_orders_handler,
        orders::handlers::get_order_handler,
        orders::handlers::record_order_handler,
        orders::handlers::approve_order_handler,
        orders::handlers::reject_order_handler,
        orders::handlers::validate_order_handler,
        quotes::handlers::create_quote_handler,
        quotes::handlers::list_quotes_handler,
        quotes::handlers::get_quote_handler,
        quotes::handlers::respond_quote_handler,
        quotes::handlers::update_quote_status_handler,
        quotes::handlers::delete_quote_handler,
        settings::handlers::get_settings_handler,
        settings::handlers::update_settings_handler,
        dashboard::stats_handler,
    ),
    components(
        schemas(
            customers::Customer,
            customers::CustomerStatus,
            customers::CustomerView,
            customers::RegisterCustomerRequest,
            customers::RegistrationResponse,
            customers::RegisteredCustomer,
            customers::ApproveCustomerRequest,
            customers::AssignGroupRequest,
            customers::UpdateTermsRequest,
            groups::CustomerGroup,
            groups::CustomerGroupSummary,
            groups::CreateGroupRequest,
            groups::UpdateGroupRequest,
            pricing::PricingRule,
            pricing::PricingRuleRequest,
            pricing::ToggleRuleResponse,
            pricing::RuleType,
            pricing::AppliesTo,
            orders::B2bOrder,
            orders::ApprovalStatus,
            orders::OrderListItem,
            orders::RecordOrderRequest,
            orders::RejectOrderRequest,
            orders::OrderValidationResponse,
            quotes::QuoteRequest,
            quotes::QuoteStatus,
            quotes::CreateQuoteRequest,
            quotes::QuoteSubmittedResponse,
            quotes::RespondQuoteRequest,
            quotes::UpdateQuoteStatusRequest,
            settings::AppSettings,
            settings::UpdateSettingsRequest,
            storefront::ExternalId,
            storefront::PriceCalculationRequest,
            storefront::PriceCalculationResponse,
            storefront::PricedCustomer,
            storefront::CartValidationRequest,
            storefront::CartValidationResponse,
            storefront::CustomerStatusResponse,
            storefront::StorefrontCustomer,
            dashboard::DashboardStats,
        )
    ),
    tags(
        (name = "storefront", description = "Public endpoints called by the storefront script"),
        (name = "customers", description = "Wholesale customer approval and terms"),
        (name = "groups", description = "Customer group management"),
        (name = "pricing", description = "Pricing rule management"),
        (name = "orders", description = "Wholesale order approval"),
        (name = "quotes", description = "Quote requests"),
        (name = "settings", description = "Store-wide settings"),
        (name = "dashboard", description = "Admin dashboard")
    ),
    info(
        title = "B2B Wholesale API",
        version = "0.1.0",
        description = "Wholesale pricing, approval and quoting for Shopify stores"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub pricing: Arc<StorefrontService<PgRuleStore>>,
    pub session_verifier: Arc<SessionTokenVerifier>,
}

impl AppState {
    pub fn new(db: PgPool, config: &Config) -> Self {
        let store = PgRuleStore::with_ttl(db.clone(), config.rule_cache_ttl);
        Self {
            db,
            pricing: Arc::new(StorefrontService::new(store)),
            session_verifier: Arc::new(SessionTokenVerifier::new(
                config.shopify_api_key.clone(),
                &config.shopify_api_secret,
            )),
        }
    }

    /// The cached rule store behind the pricing service.
    pub fn rule_store(&self) -> &PgRuleStore {
        self.pricing.store()
    }
}

impl FromRef<AppState> for Arc<SessionTokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.session_verifier.clone()
    }
}

/// Handler for GET /health
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    // The storefront script runs on the shop's own domain
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let storefront_routes = storefront::routes::<PgRuleStore>()
        .with_state(state.pricing.clone())
        .merge(customers::public_routes())
        .merge(quotes::public_routes());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest("/api/storefront", storefront_routes)
        .nest("/api/customers", customers::routes())
        .nest("/api/groups", groups::routes())
        .nest("/api/pricing", pricing::routes())
        .nest("/api/orders", orders::routes())
        .nest("/api/quotes", quotes::routes())
        .nest("/api/settings", settings::routes())
        .route("/api/stats", get(dashboard::stats_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

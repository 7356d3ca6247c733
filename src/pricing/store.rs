// Rule Store
//
// Read side of customers, groups, rules and the store-wide minimum as seen by
// price resolution. Active rules are cached with a TTL; admin writes to rules
// invalidate the cache.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::customers::Customer;
use crate::groups::CustomerGroup;
use crate::pricing::error::PricingResult;
use crate::pricing::models::PricingRule;
use crate::validation::normalize_email;

/// Default time-to-live for the active rule cache.
pub const DEFAULT_RULE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Read-only lookups needed to price a line or check an order.
pub trait RuleStore: Send + Sync + 'static {
    /// Customer by email, case-insensitive.
    fn find_customer_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = PricingResult<Option<Customer>>> + Send;

    /// All rules with `active = true`.
    ///
    /// The resolver walks rules in the returned order, and among rules with
    /// the same discount and a positive priority the last one wins, so the
    /// order is part of an implementation's pricing behavior.
    fn list_active_rules(&self) -> impl Future<Output = PricingResult<Vec<PricingRule>>> + Send;

    fn get_group(&self, id: i32) -> impl Future<Output = PricingResult<Option<CustomerGroup>>> + Send;

    /// Store-wide minimum order value; `None` when unset.
    fn global_minimum_order_value(&self) -> impl Future<Output = PricingResult<Option<Decimal>>> + Send;
}

#[derive(Debug, Default)]
struct RuleCache {
    rules: Vec<PricingRule>,
    loaded_at: Option<Instant>,
}

impl RuleCache {
    fn is_stale(&self, ttl: Duration) -> bool {
        match self.loaded_at {
            Some(loaded_at) => loaded_at.elapsed() > ttl,
            None => true,
        }
    }
}

/// PostgreSQL-backed [`RuleStore`].
#[derive(Clone)]
pub struct PgRuleStore {
    pool: PgPool,
    cache: Arc<RwLock<RuleCache>>,
    cache_ttl: Duration,
}

impl PgRuleStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_ttl(pool, DEFAULT_RULE_CACHE_TTL)
    }

    pub fn with_ttl(pool: PgPool, cache_ttl: Duration) -> Self {
        Self {
            pool,
            cache: Arc::new(RwLock::new(RuleCache::default())),
            cache_ttl,
        }
    }

    /// Drop cached rules so the next lookup reloads them.
    pub async fn invalidate_rules(&self) {
        let mut cache = self.cache.write().await;
        cache.loaded_at = None;
        cache.rules.clear();
        debug!("Pricing rule cache invalidated");
    }

    async fn load_active_rules(&self) -> PricingResult<Vec<PricingRule>> {
        let rules = sqlx::query_as::<_, PricingRule>(
            r#"
            SELECT id, name, rule_type, value, applies_to, product_ids, collection_ids,
                   customer_group_id, customer_id, min_quantity, max_quantity,
                   start_date, end_date, priority, active, created_at, updated_at
            FROM pricing_rules
            WHERE active = TRUE
            ORDER BY priority DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }
}

impl RuleStore for PgRuleStore {
    async fn find_customer_by_email(&self, email: &str) -> PricingResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, shopify_customer_id, email, first_name, last_name, company_name,
                   phone, business_type, tax_id, status, group_id, discount_percentage,
                   minimum_order_value, maximum_order_value, payment_terms,
                   approved_by, approved_at, created_at, updated_at
            FROM b2b_customers
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Active rules ordered by `priority DESC, id`, served from the TTL cache.
    ///
    /// Among equally good rules with positive priority, the lowest-priority
    /// (then highest id) one is applied.
    async fn list_active_rules(&self) -> PricingResult<Vec<PricingRule>> {
        {
            let cache = self.cache.read().await;
            if !cache.is_stale(self.cache_ttl) {
                return Ok(cache.rules.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the write lock.
        if !cache.is_stale(self.cache_ttl) {
            return Ok(cache.rules.clone());
        }

        debug!("Reloading active pricing rules");
        let rules = self.load_active_rules().await?;
        cache.rules = rules.clone();
        cache.loaded_at = Some(Instant::now());
        Ok(rules)
    }

    async fn get_group(&self, id: i32) -> PricingResult<Option<CustomerGroup>> {
        let group = sqlx::query_as::<_, CustomerGroup>(
            r#"
            SELECT id, name, description, discount_percentage, minimum_order_value,
                   maximum_order_value, payment_terms, auto_approve, created_at, updated_at
            FROM customer_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn global_minimum_order_value(&self) -> PricingResult<Option<Decimal>> {
        let raw: Option<String> =
            sqlx::query_scalar("SELECT value FROM app_settings WHERE key = 'min_order_value'")
                .fetch_optional(&self.pool)
                .await?;

        Ok(raw.and_then(|value| parse_minimum(&value)))
    }
}

/// Parse the stored setting; blank, zero or unparseable values mean unset.
fn parse_minimum(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Decimal::from_str(trimmed) {
        Ok(amount) if amount > Decimal::ZERO => Some(amount),
        Ok(_) => None,
        Err(_) => {
            warn!("Ignoring non-numeric min_order_value setting: {}", trimmed);
            None
        }
    }
}

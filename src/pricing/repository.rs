use sqlx::PgPool;

use crate::error::ApiError;
use crate::pricing::models::{PricingRule, PricingRuleRequest};

const RULE_COLUMNS: &str = "id, name, rule_type, value, applies_to, product_ids, collection_ids, \
     customer_group_id, customer_id, min_quantity, max_quantity, start_date, end_date, \
     priority, active, created_at, updated_at";

/// Admin CRUD over `pricing_rules`.
#[derive(Clone)]
pub struct PricingRuleRepository {
    pool: PgPool,
}

impl PricingRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All rules, highest priority first.
    pub async fn list(&self) -> Result<Vec<PricingRule>, ApiError> {
        let rules = sqlx::query_as::<_, PricingRule>(&format!(
            "SELECT {} FROM pricing_rules ORDER BY priority DESC, created_at DESC",
            RULE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<PricingRule>, ApiError> {
        let rule = sqlx::query_as::<_, PricingRule>(&format!(
            "SELECT {} FROM pricing_rules WHERE id = $1",
            RULE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }

    pub async fn create(&self, request: &PricingRuleRequest) -> Result<PricingRule, ApiError> {
        let rule = sqlx::query_as::<_, PricingRule>(&format!(
            r#"
            INSERT INTO pricing_rules (
                name, rule_type, value, applies_to, product_ids, collection_ids,
                customer_group_id, customer_id, min_quantity, max_quantity,
                start_date, end_date, priority, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            RULE_COLUMNS
        ))
        .bind(request.name.trim())
        .bind(request.rule_type)
        .bind(request.value)
        .bind(request.applies_to)
        .bind(&request.product_ids)
        .bind(&request.collection_ids)
        .bind(request.customer_group_id)
        .bind(request.customer_id)
        .bind(request.min_quantity)
        .bind(request.max_quantity)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.priority)
        .bind(request.active)
        .fetch_one(&self.pool)
        .await?;

        Ok(rule)
    }

    /// Replace every editable field of a rule.
    pub async fn update(
        &self,
        id: i32,
        request: &PricingRuleRequest,
    ) -> Result<Option<PricingRule>, ApiError> {
        let rule = sqlx::query_as::<_, PricingRule>(&format!(
            r#"
            UPDATE pricing_rules
            SET name = $1, rule_type = $2, value = $3, applies_to = $4,
                product_ids = $5, collection_ids = $6, customer_group_id = $7,
                customer_id = $8, min_quantity = $9, max_quantity = $10,
                start_date = $11, end_date = $12, priority = $13, active = $14,
                updated_at = NOW()
            WHERE id = $15
            RETURNING {}
            "#,
            RULE_COLUMNS
        ))
        .bind(request.name.trim())
        .bind(request.rule_type)
        .bind(request.value)
        .bind(request.applies_to)
        .bind(&request.product_ids)
        .bind(&request.collection_ids)
        .bind(request.customer_group_id)
        .bind(request.customer_id)
        .bind(request.min_quantity)
        .bind(request.max_quantity)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.priority)
        .bind(request.active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rule)
    }

    /// Flip `active`; returns the new value.
    pub async fn toggle(&self, id: i32) -> Result<Option<bool>, ApiError> {
        let active: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE pricing_rules
            SET active = NOT active, updated_at = NOW()
            WHERE id = $1
            RETURNING active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(active)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

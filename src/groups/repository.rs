use sqlx::PgPool;

use crate::error::{conflict_on_unique, ApiError};
use crate::groups::models::{
    CreateGroupRequest, CustomerGroup, CustomerGroupSummary, UpdateGroupRequest,
};

const GROUP_COLUMNS: &str = "id, name, description, discount_percentage, minimum_order_value, \
     maximum_order_value, payment_terms, auto_approve, created_at, updated_at";

/// Repository for customer group operations
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Groups by name, with how many customers reference each.
    pub async fn list(&self) -> Result<Vec<CustomerGroupSummary>, ApiError> {
        let groups = sqlx::query_as::<_, CustomerGroupSummary>(
            r#"
            SELECT g.id, g.name, g.description, g.discount_percentage, g.minimum_order_value,
                   g.maximum_order_value, g.payment_terms, g.auto_approve, g.created_at,
                   g.updated_at, COUNT(c.id) AS customer_count
            FROM customer_groups g
            LEFT JOIN b2b_customers c ON c.group_id = g.id
            GROUP BY g.id
            ORDER BY g.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<CustomerGroup>, ApiError> {
        let group = sqlx::query_as::<_, CustomerGroup>(&format!(
            "SELECT {} FROM customer_groups WHERE id = $1",
            GROUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    pub async fn create(&self, request: &CreateGroupRequest) -> Result<CustomerGroup, ApiError> {
        let name = request.name.trim();
        sqlx::query_as::<_, CustomerGroup>(&format!(
            r#"
            INSERT INTO customer_groups (
                name, description, discount_percentage, minimum_order_value,
                maximum_order_value, payment_terms, auto_approve
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            GROUP_COLUMNS
        ))
        .bind(name)
        .bind(&request.description)
        .bind(request.discount_percentage)
        .bind(request.minimum_order_value)
        .bind(request.maximum_order_value)
        .bind(&request.payment_terms)
        .bind(request.auto_approve)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, &format!("Customer group '{}' already exists", name)))
    }

    /// Apply the fields present in `request`; others keep their value.
    pub async fn update(
        &self,
        id: i32,
        request: &UpdateGroupRequest,
    ) -> Result<Option<CustomerGroup>, ApiError> {
        sqlx::query_as::<_, CustomerGroup>(&format!(
            r#"
            UPDATE customer_groups
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                discount_percentage = COALESCE($3, discount_percentage),
                minimum_order_value = COALESCE($4, minimum_order_value),
                maximum_order_value = COALESCE($5, maximum_order_value),
                payment_terms = COALESCE($6, payment_terms),
                auto_approve = COALESCE($7, auto_approve),
                updated_at = NOW()
            WHERE id = $8
            RETURNING {}
            "#,
            GROUP_COLUMNS
        ))
        .bind(request.name.as_deref().map(str::trim))
        .bind(&request.description)
        .bind(request.discount_percentage)
        .bind(request.minimum_order_value)
        .bind(request.maximum_order_value)
        .bind(&request.payment_terms)
        .bind(request.auto_approve)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A customer group with that name already exists"))
    }

    /// Delete a group. Customers keep their copied terms and a dangling `group_id`.
    pub async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM customer_groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::orders::{ApprovalStatus, B2bOrder, OrderListItem};

const ORDER_COLUMNS: &str = "id, shopify_order_id, order_number, customer_id, total_amount, \
     approval_status, approved_by, approved_at, rejection_reason, created_at, updated_at";

const LIST_COLUMNS: &str = "o.id, o.shopify_order_id, o.order_number, o.customer_id, \
     o.total_amount, o.approval_status, o.approved_by, o.approved_at, o.rejection_reason, \
     o.created_at, o.updated_at, c.email, c.company_name";

/// Repository for wholesale order operations
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an order for `customer_id` with its initial decision.
    pub async fn create(
        &self,
        customer_id: i32,
        shopify_order_id: Option<&str>,
        order_number: Option<&str>,
        total_amount: Decimal,
        status: ApprovalStatus,
        approved_by: Option<&str>,
    ) -> Result<B2bOrder, ApiError> {
        let order = sqlx::query_as::<_, B2bOrder>(&format!(
            r#"
            INSERT INTO b2b_orders (
                shopify_order_id, order_number, customer_id, total_amount,
                approval_status, approved_by, approved_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $5 = 'approved' THEN NOW() END)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(shopify_order_id)
        .bind(order_number)
        .bind(customer_id)
        .bind(total_amount)
        .bind(status)
        .bind(approved_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<B2bOrder>, ApiError> {
        let order = sqlx::query_as::<_, B2bOrder>(&format!(
            "SELECT {} FROM b2b_orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn find_with_customer(&self, id: i32) -> Result<Option<OrderListItem>, ApiError> {
        let order = sqlx::query_as::<_, OrderListItem>(&format!(
            r#"
            SELECT {}
            FROM b2b_orders o
            LEFT JOIN b2b_customers c ON o.customer_id = c.id
            WHERE o.id = $1
            "#,
            LIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Orders newest first, optionally filtered by approval status
    pub async fn list(&self, status: Option<ApprovalStatus>) -> Result<Vec<OrderListItem>, ApiError> {
        let orders = match status {
            Some(status_filter) => {
                sqlx::query_as::<_, OrderListItem>(&format!(
                    r#"
                    SELECT {}
                    FROM b2b_orders o
                    LEFT JOIN b2b_customers c ON o.customer_id = c.id
                    WHERE o.approval_status = $1
                    ORDER BY o.created_at DESC
                    "#,
                    LIST_COLUMNS
                ))
                .bind(status_filter)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderListItem>(&format!(
                    r#"
                    SELECT {}
                    FROM b2b_orders o
                    LEFT JOIN b2b_customers c ON o.customer_id = c.id
                    ORDER BY o.created_at DESC
                    "#,
                    LIST_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(orders)
    }

    /// Store an approval decision
    pub async fn decide(
        &self,
        id: i32,
        status: ApprovalStatus,
        actor: &str,
        rejection_reason: Option<&str>,
    ) -> Result<Option<B2bOrder>, ApiError> {
        let order = sqlx::query_as::<_, B2bOrder>(&format!(
            r#"
            UPDATE b2b_orders
            SET approval_status = $1,
                approved_by = $2,
                approved_at = NOW(),
                rejection_reason = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(status)
        .bind(actor)
        .bind(rejection_reason)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Total orders and orders awaiting a decision
    pub async fn counts(&self) -> Result<(i64, i64), ApiError> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE approval_status = 'pending')
            FROM b2b_orders
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}

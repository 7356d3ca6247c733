use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::customers::models::{
    Customer, CustomerListItem, CustomerStatus, RegisterCustomerRequest, UpdateTermsRequest,
};
use crate::error::{conflict_on_unique, ApiError};
use crate::groups::CustomerGroup;
use crate::validation::normalize_email;

const CUSTOMER_COLUMNS: &str = "id, shopify_customer_id, email, first_name, last_name, \
     company_name, phone, business_type, tax_id, status, group_id, discount_percentage, \
     minimum_order_value, maximum_order_value, payment_terms, approved_by, approved_at, \
     created_at, updated_at";

const LIST_COLUMNS: &str = "c.id, c.shopify_customer_id, c.email, c.first_name, c.last_name, \
     c.company_name, c.phone, c.business_type, c.tax_id, c.status, c.group_id, \
     c.discount_percentage, c.minimum_order_value, c.maximum_order_value, c.payment_terms, \
     c.approved_by, c.approved_at, c.created_at, c.updated_at, g.name AS group_name";

/// Repository for wholesale customer operations
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest customers first, with the group name joined in.
    pub async fn list(
        &self,
        status: Option<CustomerStatus>,
    ) -> Result<Vec<CustomerListItem>, ApiError> {
        let customers = match status {
            Some(status_filter) => {
                sqlx::query_as::<_, CustomerListItem>(&format!(
                    r#"
                    SELECT {}
                    FROM b2b_customers c
                    LEFT JOIN customer_groups g ON c.group_id = g.id
                    WHERE c.status = $1
                    ORDER BY c.created_at DESC
                    "#,
                    LIST_COLUMNS
                ))
                .bind(status_filter)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CustomerListItem>(&format!(
                    r#"
                    SELECT {}
                    FROM b2b_customers c
                    LEFT JOIN customer_groups g ON c.group_id = g.id
                    ORDER BY c.created_at DESC
                    "#,
                    LIST_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(customers)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<CustomerListItem>, ApiError> {
        let customer = sqlx::query_as::<_, CustomerListItem>(&format!(
            r#"
            SELECT {}
            FROM b2b_customers c
            LEFT JOIN customer_groups g ON c.group_id = g.id
            WHERE c.id = $1
            "#,
            LIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, ApiError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {} FROM b2b_customers WHERE email = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Insert a pending customer from the registration form.
    pub async fn register(&self, request: &RegisterCustomerRequest) -> Result<Customer, ApiError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO b2b_customers (
                shopify_customer_id, email, first_name, last_name, company_name,
                phone, business_type, tax_id, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(&request.shopify_customer_id)
        .bind(normalize_email(&request.email))
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.company.trim())
        .bind(&request.phone)
        .bind(&request.business_type)
        .bind(&request.tax_id)
        .bind(CustomerStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                "This email is already registered. Please use a different email or contact support.",
            )
        })
    }

    /// Move the customer to `status` under a row lock.
    ///
    /// When `group` is given its terms are copied onto the customer in the same
    /// transaction, so a failed or conflicting decision leaves the row as it was.
    /// Approving records the actor and time.
    pub async fn decide(
        &self,
        id: i32,
        status: CustomerStatus,
        group: Option<&CustomerGroup>,
        actor: &str,
    ) -> Result<Option<Customer>, ApiError> {
        let mut tx = self.pool.begin().await?;

        let current = match lock_status(&mut tx, id).await? {
            Some(current) => current,
            None => return Ok(None),
        };
        ensure_transition(current, status)?;

        if group.is_some() {
            write_group(&mut tx, id, group).await?;
        }
        let customer = write_status(&mut tx, id, status, actor).await?;

        tx.commit().await?;
        Ok(customer)
    }

    /// Point the customer at `group` and copy its terms, or clear the group
    /// and reset the terms to retail defaults.
    ///
    /// A pending customer placed in an auto-approve group is approved in the
    /// same transaction.
    pub async fn assign_group(
        &self,
        id: i32,
        group: Option<&CustomerGroup>,
        actor: &str,
    ) -> Result<Option<Customer>, ApiError> {
        let mut tx = self.pool.begin().await?;

        let current = match lock_status(&mut tx, id).await? {
            Some(current) => current,
            None => return Ok(None),
        };

        let mut customer = write_group(&mut tx, id, group).await?;
        let auto_approve = group.is_some_and(|group| group.auto_approve);
        if auto_approve && current == CustomerStatus::Pending {
            customer = write_status(&mut tx, id, CustomerStatus::Approved, actor).await?;
        }

        tx.commit().await?;
        Ok(customer)
    }

    /// Override individual terms. Omitted fields keep their value.
    pub async fn update_terms(
        &self,
        id: i32,
        request: &UpdateTermsRequest,
    ) -> Result<Option<Customer>, ApiError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE b2b_customers
            SET discount_percentage = COALESCE($1, discount_percentage),
                minimum_order_value = COALESCE($2, minimum_order_value),
                maximum_order_value = COALESCE($3, maximum_order_value),
                payment_terms = COALESCE($4, payment_terms),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(request.discount_percentage)
        .bind(request.minimum_order_value)
        .bind(request.maximum_order_value)
        .bind(&request.payment_terms)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Customer counts keyed by status.
    pub async fn count_by_status(&self) -> Result<Vec<(CustomerStatus, i64)>, ApiError> {
        let counts = sqlx::query_as::<_, (CustomerStatus, i64)>(
            "SELECT status, COUNT(*) FROM b2b_customers GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}

/// Decisions can be revised between approved and rejected; nothing returns to pending.
pub(crate) fn ensure_transition(from: CustomerStatus, to: CustomerStatus) -> Result<(), ApiError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(ApiError::conflict(format!(
            "Cannot move customer from {} to {}",
            from, to
        )))
    }
}

async fn lock_status(conn: &mut PgConnection, id: i32) -> Result<Option<CustomerStatus>, ApiError> {
    let status = sqlx::query_scalar::<_, CustomerStatus>(
        "SELECT status FROM b2b_customers WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(status)
}

async fn write_status(
    conn: &mut PgConnection,
    id: i32,
    status: CustomerStatus,
    actor: &str,
) -> Result<Option<Customer>, ApiError> {
    let customer = sqlx::query_as::<_, Customer>(&format!(
        r#"
        UPDATE b2b_customers
        SET status = $1,
            approved_by = CASE WHEN $1 = 'approved' THEN $2 ELSE approved_by END,
            approved_at = CASE WHEN $1 = 'approved' THEN NOW() ELSE approved_at END,
            updated_at = NOW()
        WHERE id = $3
        RETURNING {}
        "#,
        CUSTOMER_COLUMNS
    ))
    .bind(status)
    .bind(actor)
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(customer)
}

async fn write_group(
    conn: &mut PgConnection,
    id: i32,
    group: Option<&CustomerGroup>,
) -> Result<Option<Customer>, ApiError> {
    let query = format!(
        r#"
        UPDATE b2b_customers
        SET group_id = $1,
            discount_percentage = $2,
            minimum_order_value = $3,
            maximum_order_value = $4,
            payment_terms = $5,
            updated_at = NOW()
        WHERE id = $6
        RETURNING {}
        "#,
        CUSTOMER_COLUMNS
    );

    let customer = match group {
        Some(group) => {
            sqlx::query_as::<_, Customer>(&query)
                .bind(group.id)
                .bind(group.discount_percentage)
                .bind(Some(group.minimum_order_value))
                .bind(group.maximum_order_value)
                .bind(&group.payment_terms)
                .bind(id)
                .fetch_optional(conn)
                .await?
        }
        None => {
            sqlx::query_as::<_, Customer>(&query)
                .bind(None::<i32>)
                .bind(Decimal::ZERO)
                .bind(None::<Decimal>)
                .bind(None::<Decimal>)
                .bind("immediate")
                .bind(id)
                .fetch_optional(conn)
                .await?
        }
    };

    Ok(customer)
}

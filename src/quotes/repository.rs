use sqlx::PgPool;

use crate::error::ApiError;
use crate::quotes::models::{CreateQuoteRequest, QuoteRequest, QuoteStatus, RespondQuoteRequest};
use crate::validation::normalize_email;

const QUOTE_COLUMNS: &str = "id, customer_id, customer_email, company_name, products, quantities, \
     message, status, quote_amount, quote_valid_until, quote_notes, responded_by, responded_at, \
     created_at, updated_at";

/// Repository for quote request operations
#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a quote request, linking it to the customer with the same email if any.
    pub async fn create(&self, request: &CreateQuoteRequest) -> Result<QuoteRequest, ApiError> {
        let email = normalize_email(&request.customer_email);
        let products: Vec<String> = request
            .products
            .iter()
            .map(|product| product.trim().to_string())
            .collect();

        let quote = sqlx::query_as::<_, QuoteRequest>(&format!(
            r#"
            INSERT INTO quote_requests (
                customer_id, customer_email, company_name, products, quantities, message
            )
            VALUES (
                COALESCE((SELECT id FROM b2b_customers WHERE email = $1), 0),
                $1, $2, $3, $4, $5
            )
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        ))
        .bind(&email)
        .bind(&request.company_name)
        .bind(&products)
        .bind(&request.quantities)
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn list(&self) -> Result<Vec<QuoteRequest>, ApiError> {
        let quotes = sqlx::query_as::<_, QuoteRequest>(&format!(
            "SELECT {} FROM quote_requests ORDER BY created_at DESC",
            QUOTE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<QuoteRequest>, ApiError> {
        let quote = sqlx::query_as::<_, QuoteRequest>(&format!(
            "SELECT {} FROM quote_requests WHERE id = $1",
            QUOTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn respond(
        &self,
        id: i32,
        request: &RespondQuoteRequest,
        actor: &str,
    ) -> Result<Option<QuoteRequest>, ApiError> {
        let quote = sqlx::query_as::<_, QuoteRequest>(&format!(
            r#"
            UPDATE quote_requests
            SET quote_amount = $1,
                quote_valid_until = $2,
                quote_notes = $3,
                status = $4,
                responded_by = $5,
                responded_at = NOW(),
                updated_at = NOW()
            WHERE id = $6
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        ))
        .bind(request.quote_amount)
        .bind(request.quote_valid_until)
        .bind(request.quote_notes.as_deref().unwrap_or(""))
        .bind(request.status.unwrap_or(QuoteStatus::Responded))
        .bind(actor)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn set_status(
        &self,
        id: i32,
        status: QuoteStatus,
    ) -> Result<Option<QuoteRequest>, ApiError> {
        let quote = sqlx::query_as::<_, QuoteRequest>(&format!(
            r#"
            UPDATE quote_requests
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quote)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM quote_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_status(&self, status: QuoteStatus) -> Result<i64, ApiError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM quote_requests WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

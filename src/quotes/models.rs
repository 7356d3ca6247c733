use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::validation::validate_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Responded,
    Accepted,
    Rejected,
    Expired,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Responded => "responded",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
        }
    }
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Pending
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request for custom wholesale pricing. `products[i]` is wanted in
/// `quantities[i]` units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct QuoteRequest {
    pub id: i32,
    /// 0 when the email matched no customer
    pub customer_id: i32,
    pub customer_email: String,
    pub company_name: Option<String>,
    pub products: Vec<String>,
    pub quantities: Vec<i32>,
    pub message: Option<String>,
    pub status: QuoteStatus,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub quote_amount: Option<Decimal>,

    pub quote_valid_until: Option<DateTime<Utc>>,
    pub quote_notes: Option<String>,
    pub responded_by: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_quote_lines", skip_on_field_errors = false))]
pub struct CreateQuoteRequest {
    #[validate(email(message = "A valid email is required"))]
    pub customer_email: String,

    #[validate(length(max = 255))]
    pub company_name: Option<String>,

    #[validate(length(min = 1, message = "At least one product is required"))]
    pub products: Vec<String>,

    #[validate(length(min = 1, message = "At least one quantity is required"))]
    pub quantities: Vec<i32>,

    #[validate(length(max = 5000))]
    pub message: Option<String>,
}

fn validate_quote_lines(request: &CreateQuoteRequest) -> Result<(), ValidationError> {
    if request.products.len() != request.quantities.len() {
        return Err(ValidationError::new("products_and_quantities_differ_in_length"));
    }
    if request.products.iter().any(|product| product.trim().is_empty()) {
        return Err(ValidationError::new("blank_product"));
    }
    if request.quantities.iter().any(|quantity| *quantity < 1) {
        return Err(ValidationError::new("quantity_below_one"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteSubmittedResponse {
    pub success: bool,
    pub id: i32,
    pub message: String,
}

impl QuoteSubmittedResponse {
    pub fn new(id: i32) -> Self {
        Self {
            success: true,
            id,
            message: "Quote request submitted successfully. We will contact you soon.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RespondQuoteRequest {
    #[validate(custom = "validate_money")]
    #[schema(value_type = Option<f64>)]
    pub quote_amount: Option<Decimal>,

    pub quote_valid_until: Option<DateTime<Utc>>,

    #[validate(length(max = 5000))]
    pub quote_notes: Option<String>,

    /// Defaults to `responded`
    pub status: Option<QuoteStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
}

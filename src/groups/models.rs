use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{validate_money, validate_payment_terms, validate_percentage};

/// A wholesale tier. Its terms are copied onto customers at assignment time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CustomerGroup {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub discount_percentage: Decimal,
    pub minimum_order_value: Decimal,
    pub maximum_order_value: Option<Decimal>,
    pub payment_terms: String,
    pub auto_approve: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Group with the number of customers currently pointing at it.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CustomerGroupSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub group: CustomerGroup,
    pub customer_count: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 255, message = "Group name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom = "validate_percentage")]
    #[serde(default)]
    pub discount_percentage: Decimal,

    #[validate(custom = "validate_money")]
    #[serde(default)]
    pub minimum_order_value: Decimal,

    #[validate(custom = "validate_money")]
    pub maximum_order_value: Option<Decimal>,

    #[validate(custom = "validate_payment_terms")]
    #[serde(default = "default_payment_terms")]
    pub payment_terms: String,

    #[serde(default)]
    pub auto_approve: bool,
}

/// Partial update; omitted fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 255, message = "Group name must be 1-255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom = "validate_percentage")]
    pub discount_percentage: Option<Decimal>,

    #[validate(custom = "validate_money")]
    pub minimum_order_value: Option<Decimal>,

    #[validate(custom = "validate_money")]
    pub maximum_order_value: Option<Decimal>,

    #[validate(custom = "validate_payment_terms")]
    pub payment_terms: Option<String>,

    pub auto_approve: Option<bool>,
}

pub fn default_payment_terms() -> String {
    "immediate".to_string()
}

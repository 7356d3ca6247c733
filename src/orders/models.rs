use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::storefront::models::CartValidationResponse;
use crate::validation::validate_money;

/// Merchant decision on a wholesale order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        ApprovalStatus::Pending
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {}", s)),
        }
    }
}

/// Wholesale order recorded for approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct B2bOrder {
    pub id: i32,
    pub shopify_order_id: Option<String>,
    pub order_number: Option<String>,
    pub customer_id: i32,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,

    pub approval_status: ApprovalStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order row joined with the ordering customer
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OrderListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: B2bOrder,
    pub email: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordOrderRequest {
    #[validate(email(message = "A valid customer email is required"))]
    pub customer_email: String,

    #[validate(custom = "validate_money")]
    #[schema(value_type = f64)]
    pub total_amount: Decimal,

    #[validate(length(max = 64))]
    pub shopify_order_id: Option<String>,

    #[validate(length(max = 64))]
    pub order_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RejectOrderRequest {
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

impl RejectOrderRequest {
    pub fn reason_or_default(&self) -> String {
        match self.reason.as_deref().map(str::trim) {
            Some(reason) if !reason.is_empty() => reason.to_string(),
            _ => "Order rejected".to_string(),
        }
    }
}

/// Cart validation for the order flow, with the store's approval setting.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderValidationResponse {
    #[serde(flatten)]
    pub cart: CartValidationResponse,
    pub requires_approval: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::OrderLimitCheck;
    use serde_json::json;

    #[test]
    fn test_status_parsing() {
        assert_eq!("APPROVED".parse::<ApprovalStatus>().unwrap(), ApprovalStatus::Approved);
        assert!("shipped".parse::<ApprovalStatus>().is_err());
        assert_eq!(ApprovalStatus::default(), ApprovalStatus::Pending);
    }

    #[test]
    fn test_reject_reason_default() {
        assert_eq!(RejectOrderRequest::default().reason_or_default(), "Order rejected");
        let blank = RejectOrderRequest {
            reason: Some("   ".to_string()),
        };
        assert_eq!(blank.reason_or_default(), "Order rejected");
        let given = RejectOrderRequest {
            reason: Some("Credit limit exceeded".to_string()),
        };
        assert_eq!(given.reason_or_default(), "Credit limit exceeded");
    }

    #[test]
    fn test_record_request_validation() {
        let request: RecordOrderRequest = serde_json::from_value(json!({
            "customer_email": "buyer@example.com",
            "total_amount": 420.5,
            "order_number": "#1001"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let negative: RecordOrderRequest = serde_json::from_value(json!({
            "customer_email": "buyer@example.com",
            "total_amount": -1
        }))
        .unwrap();
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_validation_response_flattens_cart() {
        let response = OrderValidationResponse {
            cart: CartValidationResponse::new(
                OrderLimitCheck {
                    valid: true,
                    errors: Vec::new(),
                },
                None,
            ),
            requires_approval: true,
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["valid"], json!(true));
        assert_eq!(value["requires_approval"], json!(true));
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{validate_money, validate_payment_terms, validate_percentage};

/// Registration/approval state of a wholesale customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Pending,
    Approved,
    Rejected,
}

impl CustomerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Pending => "pending",
            CustomerStatus::Approved => "approved",
            CustomerStatus::Rejected => "rejected",
        }
    }

    /// Admin decisions move a customer between approved and rejected freely;
    /// nothing returns a customer to pending.
    pub fn can_transition_to(self, to: CustomerStatus) -> bool {
        self == to || to != CustomerStatus::Pending
    }
}

impl Default for CustomerStatus {
    fn default() -> Self {
        CustomerStatus::Pending
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CustomerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(CustomerStatus::Pending),
            "approved" => Ok(CustomerStatus::Approved),
            "rejected" => Ok(CustomerStatus::Rejected),
            _ => Err(format!("Invalid customer status: {}", s)),
        }
    }
}

/// Wholesale customer record, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub shopify_customer_id: Option<String>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub business_type: Option<String>,
    pub tax_id: Option<String>,
    pub status: CustomerStatus,
    pub group_id: Option<i32>,
    pub discount_percentage: Decimal,
    pub minimum_order_value: Option<Decimal>,
    pub maximum_order_value: Option<Decimal>,
    pub payment_terms: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn is_b2b(&self) -> bool {
        self.status == CustomerStatus::Approved
    }

    /// Display name: company, else the local part of the email.
    pub fn display_name(&self) -> &str {
        match self.company_name.as_deref() {
            Some(company) if !company.trim().is_empty() => company,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Row of the admin customer list, with the group name joined for display.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CustomerListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub name: String,
    pub group_name: String,
}

impl From<CustomerListItem> for CustomerView {
    fn from(item: CustomerListItem) -> Self {
        let name = item.customer.display_name().to_string();
        Self {
            customer: item.customer,
            name,
            group_name: item.group_name.unwrap_or_else(|| "None".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerListQuery {
    pub status: Option<CustomerStatus>,
}

/// Storefront registration form.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[validate(length(max = 255))]
    pub last_name: Option<String>,

    #[serde(alias = "companyName")]
    #[validate(length(min = 1, max = 255, message = "Company name is required"))]
    pub company: String,

    #[validate(length(max = 64))]
    pub phone: Option<String>,

    #[validate(length(max = 128))]
    pub business_type: Option<String>,

    #[validate(length(max = 64))]
    pub tax_id: Option<String>,

    pub shopify_customer_id: Option<String>,
}

/// Reply to a storefront registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub success: bool,
    pub message: String,
    pub customer: RegisteredCustomer,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisteredCustomer {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub company: Option<String>,
    pub status: CustomerStatus,
}

impl From<&Customer> for RegistrationResponse {
    fn from(customer: &Customer) -> Self {
        let name = match (customer.first_name.as_deref(), customer.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => customer.display_name().to_string(),
        };
        Self {
            success: true,
            message: "B2B application submitted successfully. We will review it shortly."
                .to_string(),
            customer: RegisteredCustomer {
                id: customer.id,
                email: customer.email.clone(),
                name,
                company: customer.company_name.clone(),
                status: customer.status,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ApproveCustomerRequest {
    /// Group to assign while approving
    pub group_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignGroupRequest {
    /// `null` removes the customer from its group
    pub group_id: Option<i32>,
}

/// Per-customer overrides of the terms copied from the group.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTermsRequest {
    #[validate(custom = "validate_percentage")]
    pub discount_percentage: Option<Decimal>,

    #[validate(custom = "validate_money")]
    pub minimum_order_value: Option<Decimal>,

    #[validate(custom = "validate_money")]
    pub maximum_order_value: Option<Decimal>,

    #[validate(custom = "validate_payment_terms")]
    pub payment_terms: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use rust_decimal_macros::dec;

    /// Approved customer without a group and with the given baseline discount.
    pub fn approved_customer(id: i32, email: &str, discount: Decimal) -> Customer {
        let now = Utc::now();
        Customer {
            id,
            shopify_customer_id: None,
            email: email.to_string(),
            first_name: Some("Dana".to_string()),
            last_name: Some("Buyer".to_string()),
            company_name: Some("Acme Wholesale".to_string()),
            phone: None,
            business_type: None,
            tax_id: None,
            status: CustomerStatus::Approved,
            group_id: None,
            discount_percentage: discount,
            minimum_order_value: None,
            maximum_order_value: None,
            payment_terms: "immediate".to_string(),
            approved_by: Some("test-shop.myshopify.com".to_string()),
            approved_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn customer_with_status(id: i32, email: &str, status: CustomerStatus) -> Customer {
        Customer {
            status,
            ..approved_customer(id, email, dec!(15))
        }
    }
}

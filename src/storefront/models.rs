use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::customers::{Customer, CustomerStatus};
use crate::pricing::order_limits::OrderLimitCheck;
use crate::pricing::resolver::PriceResolution;

/// Product or variant id as sent by the storefront: numeric or a GID string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ExternalId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PriceCalculationRequest {
    #[validate(length(max = 320))]
    pub customer_email: Option<String>,

    pub product_id: Option<ExternalId>,

    pub variant_id: Option<ExternalId>,

    /// Defaults to 1
    pub quantity: Option<i32>,

    #[schema(value_type = f64)]
    pub original_price: Decimal,
}

/// Customer summary attached to B2B price results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricedCustomer {
    pub id: i32,
    pub company_name: Option<String>,
    pub group_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PriceCalculationResponse {
    pub b2b_customer: bool,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub original_price: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub final_price: Decimal,

    /// Percentage points
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub discount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub discount_amount: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_rule: Option<String>,

    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub minimum_order_value: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<PricedCustomer>,
}

impl PriceCalculationResponse {
    pub fn new(resolution: PriceResolution, customer: Option<&Customer>) -> Self {
        let customer = customer.filter(|_| resolution.b2b_customer);
        Self {
            b2b_customer: resolution.b2b_customer,
            original_price: resolution.original_price,
            final_price: resolution.final_price,
            discount: resolution.discount,
            discount_amount: resolution.discount_amount,
            applied_rule: resolution.applied_rule,
            minimum_order_value: customer.and_then(|c| c.minimum_order_value),
            customer: customer.map(|c| PricedCustomer {
                id: c.id,
                company_name: c.company_name.clone(),
                group_id: c.group_id,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CartValidationRequest {
    #[validate(length(max = 320))]
    pub customer_email: Option<String>,

    #[schema(value_type = f64)]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CartValidationResponse {
    pub valid: bool,
    pub is_b2b: bool,
    pub errors: Vec<String>,

    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub minimum_order_value: Option<Decimal>,

    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<f64>)]
    pub maximum_order_value: Option<Decimal>,
}

impl CartValidationResponse {
    pub fn new(check: OrderLimitCheck, customer: Option<&Customer>) -> Self {
        let customer = customer.filter(|c| c.is_b2b());
        Self {
            valid: check.valid,
            is_b2b: customer.is_some(),
            errors: check.errors,
            minimum_order_value: customer.and_then(|c| c.minimum_order_value),
            maximum_order_value: customer.and_then(|c| c.maximum_order_value),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerStatusQuery {
    pub email: Option<String>,
}

/// Commercial terms exposed to the storefront script.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StorefrontCustomer {
    pub id: i32,
    pub company_name: Option<String>,
    pub status: CustomerStatus,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub discount_percentage: Decimal,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub minimum_order_value: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub maximum_order_value: Option<Decimal>,

    pub payment_terms: String,
    pub group_id: Option<i32>,
}

impl From<&Customer> for StorefrontCustomer {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            company_name: customer.company_name.clone(),
            status: customer.status,
            discount_percentage: customer.discount_percentage,
            minimum_order_value: customer.minimum_order_value,
            maximum_order_value: customer.maximum_order_value,
            payment_terms: customer.payment_terms.clone(),
            group_id: customer.group_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CustomerStatusResponse {
    pub is_b2b: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<StorefrontCustomer>,
}

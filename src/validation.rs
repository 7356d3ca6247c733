// Request validation
// Custom validator functions and a JSON extractor that validates before the handler runs

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::error::ApiError;

/// JSON body that has been deserialized and passed `Validate`.
///
/// Deserialization failures (missing fields, non-numeric amounts) surface as
/// 400 responses instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Amounts and percentages stored on customers, groups and rules are never negative.
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(ValidationError::new("must_be_non_negative"))
    } else {
        Ok(())
    }
}

// Integer-digit limits of the NUMERIC columns the values land in.
const PERCENTAGE_LIMIT: i64 = 1_000; // NUMERIC(7, 4)
const RULE_VALUE_LIMIT: i64 = 100_000_000; // NUMERIC(12, 4)
const MONEY_LIMIT: i64 = 10_000_000_000; // NUMERIC(12, 2)

fn validate_below(value: &Decimal, limit: i64) -> Result<(), ValidationError> {
    validate_non_negative(value)?;
    if *value >= Decimal::from(limit) {
        let mut error = ValidationError::new("out_of_range");
        error.add_param("max".into(), &limit);
        return Err(error);
    }
    Ok(())
}

/// Customer and group discount percentages.
pub fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    validate_below(value, PERCENTAGE_LIMIT)
}

/// Pricing rule `value`: a percentage or an amount depending on the rule type.
pub fn validate_rule_value(value: &Decimal) -> Result<(), ValidationError> {
    validate_below(value, RULE_VALUE_LIMIT)
}

/// Order bounds, order totals and quoted amounts.
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    validate_below(value, MONEY_LIMIT)
}

/// Payment terms are a short free-form token such as `immediate` or `net_30`.
pub fn validate_payment_terms(terms: &str) -> Result<(), ValidationError> {
    let valid = !terms.is_empty()
        && terms.len() <= 32
        && terms
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_payment_terms"))
    }
}

/// Trim and lowercase an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::validation::validate_money;

pub const APPROVAL_REQUIRED: &str = "approval_required";
pub const AUTO_APPROVE_ORDERS: &str = "auto_approve_orders";
pub const MIN_ORDER_VALUE: &str = "min_order_value";
pub const NOTIFICATION_EMAIL: &str = "notification_email";
pub const TERMS_AND_CONDITIONS: &str = "terms_and_conditions";

/// Store-wide settings, read from the `app_settings` key/value table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AppSettings {
    pub approval_required: bool,
    pub auto_approve_orders: bool,

    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub min_order_value: Decimal,

    pub notification_email: String,
    pub terms_and_conditions: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            approval_required: true,
            auto_approve_orders: false,
            min_order_value: Decimal::ZERO,
            notification_email: String::new(),
            terms_and_conditions: String::new(),
        }
    }
}

impl AppSettings {
    /// Build settings from raw rows. Unknown keys are ignored and
    /// unparseable values fall back to the default.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut settings = AppSettings::default();
        for (key, value) in pairs {
            match key {
                APPROVAL_REQUIRED => settings.approval_required = parse_flag(value),
                AUTO_APPROVE_ORDERS => settings.auto_approve_orders = parse_flag(value),
                MIN_ORDER_VALUE => {
                    settings.min_order_value = value.trim().parse().unwrap_or(Decimal::ZERO)
                }
                NOTIFICATION_EMAIL => settings.notification_email = value.to_string(),
                TERMS_AND_CONDITIONS => settings.terms_and_conditions = value.to_string(),
                _ => {}
            }
        }
        settings
    }
}

/// Only the literal `true` turns a flag on.
pub fn parse_flag(value: &str) -> bool {
    value.trim() == "true"
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSettingsRequest {
    pub approval_required: Option<bool>,

    pub auto_approve_orders: Option<bool>,

    #[validate(custom = "validate_money")]
    #[schema(value_type = Option<f64>)]
    pub min_order_value: Option<Decimal>,

    /// Empty string clears the address
    #[validate(custom = "validate_optional_email")]
    pub notification_email: Option<String>,

    #[validate(length(max = 20000))]
    pub terms_and_conditions: Option<String>,
}

impl UpdateSettingsRequest {
    /// Key/value rows to upsert, in storage form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(flag) = self.approval_required {
            pairs.push((APPROVAL_REQUIRED, flag.to_string()));
        }
        if let Some(flag) = self.auto_approve_orders {
            pairs.push((AUTO_APPROVE_ORDERS, flag.to_string()));
        }
        if let Some(amount) = self.min_order_value {
            pairs.push((MIN_ORDER_VALUE, amount.normalize().to_string()));
        }
        if let Some(email) = &self.notification_email {
            pairs.push((NOTIFICATION_EMAIL, email.trim().to_string()));
        }
        if let Some(terms) = &self.terms_and_conditions {
            pairs.push((TERMS_AND_CONDITIONS, terms.clone()));
        }
        pairs
    }
}

fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || validator::validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

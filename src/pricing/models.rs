use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::customers::Customer;
use crate::pricing::types::{AppliesTo, RuleType};
use crate::validation::validate_rule_value;

/// A stored pricing rule.
///
/// `applies_to`, `product_ids` and `collection_ids` describe the catalog scope
/// shown to merchants; resolution only looks at the customer, group, quantity
/// and date bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PricingRule {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub value: Decimal,
    pub applies_to: AppliesTo,
    pub product_ids: Vec<String>,
    pub collection_ids: Vec<String>,
    pub customer_group_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub priority: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    /// Whether this rule may apply to `customer` buying `quantity` units at `now`.
    ///
    /// `customer.group_id` must already be resolved: a customer whose group no
    /// longer exists is passed with `group_id = None`.
    pub fn is_eligible(&self, customer: &Customer, quantity: i32, now: DateTime<Utc>) -> bool {
        self.active
            && self.customer_id.map_or(true, |id| id == customer.id)
            && self
                .customer_group_id
                .map_or(true, |group| customer.group_id == Some(group))
            && quantity >= self.min_quantity
            && self.max_quantity.map_or(true, |max| quantity <= max)
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| end >= now)
    }
}

/// Body for creating or replacing a pricing rule.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_rule_bounds", skip_on_field_errors = false))]
pub struct PricingRuleRequest {
    #[validate(length(min = 1, max = 255, message = "Rule name must be 1-255 characters"))]
    pub name: String,

    #[serde(rename = "type", alias = "rule_type")]
    pub rule_type: RuleType,

    #[validate(custom = "validate_rule_value")]
    pub value: Decimal,

    #[serde(default)]
    pub applies_to: AppliesTo,

    #[serde(default)]
    pub product_ids: Vec<String>,

    #[serde(default)]
    pub collection_ids: Vec<String>,

    pub customer_group_id: Option<i32>,

    pub customer_id: Option<i32>,

    #[validate(range(min = 1, message = "min_quantity must be at least 1"))]
    #[serde(default = "default_min_quantity")]
    pub min_quantity: i32,

    #[validate(range(min = 1, message = "max_quantity must be at least 1"))]
    pub max_quantity: Option<i32>,

    pub start_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub priority: i32,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_min_quantity() -> i32 {
    1
}

fn default_active() -> bool {
    true
}

fn validate_rule_bounds(request: &PricingRuleRequest) -> Result<(), ValidationError> {
    if let Some(max) = request.max_quantity {
        if max < request.min_quantity {
            return Err(ValidationError::new("max_quantity_below_min_quantity"));
        }
    }
    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        if end < start {
            return Err(ValidationError::new("end_date_before_start_date"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToggleRuleResponse {
    pub id: i32,
    pub active: bool,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Active, unscoped percentage rule with no bounds.
    pub fn percentage_rule(id: i32, name: &str, value: Decimal) -> PricingRule {
        let now = Utc::now();
        PricingRule {
            id,
            name: name.to_string(),
            rule_type: RuleType::Percentage,
            value,
            applies_to: AppliesTo::All,
            product_ids: Vec::new(),
            collection_ids: Vec::new(),
            customer_group_id: None,
            customer_id: None,
            min_quantity: 1,
            max_quantity: None,
            start_date: None,
            end_date: None,
            priority: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rule_of_type(id: i32, name: &str, rule_type: RuleType, value: Decimal) -> PricingRule {
        PricingRule {
            rule_type,
            ..percentage_rule(id, name, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::customers::models::fixtures::approved_customer;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_unbounded_rule_is_eligible() {
        let customer = approved_customer(1, "a@b.com", dec!(0));
        let rule = percentage_rule(1, "All buyers", dec!(5));
        assert!(rule.is_eligible(&customer, 1, Utc::now()));
    }

    #[test]
    fn test_inactive_rule_is_ineligible() {
        let customer = approved_customer(1, "a@b.com", dec!(0));
        let rule = PricingRule {
            active: false,
            ..percentage_rule(1, "Paused", dec!(5))
        };
        assert!(!rule.is_eligible(&customer, 1, Utc::now()));
    }

    #[test]
    fn test_customer_scope() {
        let customer = approved_customer(7, "a@b.com", dec!(0));
        let mine = PricingRule {
            customer_id: Some(7),
            ..percentage_rule(1, "Mine", dec!(5))
        };
        let theirs = PricingRule {
            customer_id: Some(8),
            ..percentage_rule(2, "Theirs", dec!(5))
        };
        assert!(mine.is_eligible(&customer, 1, Utc::now()));
        assert!(!theirs.is_eligible(&customer, 1, Utc::now()));
    }

    #[test]
    fn test_group_scope_requires_matching_group() {
        let mut customer = approved_customer(1, "a@b.com", dec!(0));
        let rule = PricingRule {
            customer_group_id: Some(3),
            ..percentage_rule(1, "Gold tier", dec!(5))
        };
        assert!(!rule.is_eligible(&customer, 1, Utc::now()));
        customer.group_id = Some(4);
        assert!(!rule.is_eligible(&customer, 1, Utc::now()));
        customer.group_id = Some(3);
        assert!(rule.is_eligible(&customer, 1, Utc::now()));
    }

    #[test]
    fn test_quantity_bounds() {
        let customer = approved_customer(1, "a@b.com", dec!(0));
        let rule = PricingRule {
            min_quantity: 10,
            max_quantity: Some(20),
            ..percentage_rule(1, "Case price", dec!(5))
        };
        assert!(!rule.is_eligible(&customer, 9, Utc::now()));
        assert!(rule.is_eligible(&customer, 10, Utc::now()));
        assert!(rule.is_eligible(&customer, 20, Utc::now()));
        assert!(!rule.is_eligible(&customer, 21, Utc::now()));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let customer = approved_customer(1, "a@b.com", dec!(0));
        let now = Utc::now();
        let rule = PricingRule {
            start_date: Some(now),
            end_date: Some(now),
            ..percentage_rule(1, "Flash sale", dec!(5))
        };
        assert!(rule.is_eligible(&customer, 1, now));
        assert!(!rule.is_eligible(&customer, 1, now + Duration::seconds(1)));
        assert!(!rule.is_eligible(&customer, 1, now - Duration::seconds(1)));
    }

    #[test]
    fn test_request_defaults() {
        let request: PricingRuleRequest = serde_json::from_value(json!({
            "name": "Bulk",
            "type": "percentage",
            "value": 10
        }))
        .unwrap();
        assert_eq!(request.min_quantity, 1);
        assert_eq!(request.priority, 0);
        assert!(request.active);
        assert_eq!(request.applies_to, AppliesTo::All);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_non_numeric_value() {
        let result: Result<PricingRuleRequest, _> = serde_json::from_value(json!({
            "name": "Bulk",
            "type": "percentage",
            "value": "ten"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_rejects_inverted_bounds() {
        let request: PricingRuleRequest = serde_json::from_value(json!({
            "name": "Bulk",
            "type": "fixed_discount",
            "value": 5,
            "min_quantity": 10,
            "max_quantity": 5
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: PricingRuleRequest = serde_json::from_value(json!({
            "name": "Seasonal",
            "type": "percentage",
            "value": 5,
            "start_date": "2025-06-01T00:00:00Z",
            "end_date": "2025-05-01T00:00:00Z"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_rejects_negative_value() {
        let request: PricingRuleRequest = serde_json::from_value(json!({
            "name": "Surcharge",
            "type": "percentage",
            "value": -5
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_request_rejects_value_beyond_column() {
        let request: PricingRuleRequest = serde_json::from_value(json!({
            "name": "Typo",
            "type": "fixed_discount",
            "value": 1000000000
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("value"));
    }

    #[test]
    fn test_rule_serializes_type_field() {
        let rule = percentage_rule(1, "Bulk", dec!(10));
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["type"], "percentage");
        assert!(value.get("rule_type").is_none());
    }
}

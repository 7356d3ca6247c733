// Order value limits for wholesale customers

use rust_decimal::Decimal;

use crate::customers::Customer;
use crate::pricing::error::{PricingError, PricingResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLimitCheck {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl OrderLimitCheck {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check an order total against the customer's minimum/maximum and the
/// store-wide minimum.
///
/// Only approved customers are checked; everyone else passes. Every check
/// runs, so one order can collect several errors. A bound of zero counts as
/// no bound.
pub fn validate_order(
    customer: Option<&Customer>,
    total_amount: Decimal,
    global_minimum: Option<Decimal>,
) -> PricingResult<OrderLimitCheck> {
    if total_amount.is_sign_negative() && !total_amount.is_zero() {
        return Err(PricingError::Validation(
            "total_amount must be a non-negative number".to_string(),
        ));
    }

    let customer = match customer {
        Some(customer) if customer.is_b2b() => customer,
        _ => return Ok(OrderLimitCheck::from_errors(Vec::new())),
    };

    let mut errors = Vec::new();

    if let Some(minimum) = bound(customer.minimum_order_value) {
        if total_amount < minimum {
            errors.push(minimum_message(minimum));
        }
    }
    if let Some(maximum) = bound(customer.maximum_order_value) {
        if total_amount > maximum {
            errors.push(format!("Maximum order value is ${:.2}", maximum));
        }
    }
    if let Some(minimum) = bound(global_minimum) {
        if total_amount < minimum {
            errors.push(minimum_message(minimum));
        }
    }

    Ok(OrderLimitCheck::from_errors(errors))
}

fn bound(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}

fn minimum_message(minimum: Decimal) -> String {
    format!("Minimum order value is ${:.2}", minimum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::models::fixtures::{approved_customer, customer_with_status};
    use crate::customers::{Customer, CustomerStatus};
    use rust_decimal_macros::dec;

    fn bounded_customer(min: Option<Decimal>, max: Option<Decimal>) -> Customer {
        Customer {
            minimum_order_value: min,
            maximum_order_value: max,
            ..approved_customer(1, "buyer@example.com", dec!(15))
        }
    }

    #[test]
    fn test_within_bounds_is_valid() {
        let customer = bounded_customer(Some(dec!(100)), Some(dec!(5000)));
        let check = validate_order(Some(&customer), dec!(250), None).unwrap();
        assert!(check.valid);
        assert!(check.errors.is_empty());
    }

    #[test]
    fn test_below_minimum() {
        let customer = bounded_customer(Some(dec!(100)), None);
        let check = validate_order(Some(&customer), dec!(99.99), None).unwrap();
        assert!(!check.valid);
        assert_eq!(check.errors, vec!["Minimum order value is $100.00".to_string()]);
    }

    #[test]
    fn test_minimum_is_inclusive() {
        let customer = bounded_customer(Some(dec!(100)), Some(dec!(200)));
        assert!(validate_order(Some(&customer), dec!(100), None).unwrap().valid);
        assert!(validate_order(Some(&customer), dec!(200), None).unwrap().valid);
    }

    #[test]
    fn test_above_maximum() {
        let customer = bounded_customer(None, Some(dec!(1000.5)));
        let check = validate_order(Some(&customer), dec!(1200), None).unwrap();
        assert_eq!(check.errors, vec!["Maximum order value is $1000.50".to_string()]);
    }

    #[test]
    fn test_customer_and_global_minimum_both_fire() {
        let customer = bounded_customer(Some(dec!(100)), None);
        let check = validate_order(Some(&customer), dec!(50), Some(dec!(75))).unwrap();
        assert!(!check.valid);
        assert_eq!(
            check.errors,
            vec![
                "Minimum order value is $100.00".to_string(),
                "Minimum order value is $75.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_bounds_are_unset() {
        let customer = bounded_customer(Some(dec!(0)), Some(dec!(0)));
        let check = validate_order(Some(&customer), dec!(10), Some(dec!(0))).unwrap();
        assert!(check.valid);
    }

    #[test]
    fn test_non_b2b_always_valid() {
        let pending = Customer {
            minimum_order_value: Some(dec!(100)),
            ..customer_with_status(1, "buyer@example.com", CustomerStatus::Pending)
        };
        assert!(validate_order(Some(&pending), dec!(1), Some(dec!(50))).unwrap().valid);
        assert!(validate_order(None, dec!(1), Some(dec!(50))).unwrap().valid);
    }

    #[test]
    fn test_negative_total_rejected() {
        let result = validate_order(None, dec!(-5), None);
        assert!(matches!(result, Err(PricingError::Validation(_))));
    }
}

//! Wholesale price resolution.
//!
//! Given a customer, the active rules, a quantity and the original price, pick
//! the single discount to apply. The customer's own `discount_percentage` is the
//! baseline; an eligible rule replaces it when its percentage equivalent is
//! strictly larger, or equal with a positive priority. The second clause makes
//! the outcome between equal-discount positive-priority rules depend on rule
//! order; callers relying on a stable winner should give rules distinct
//! discounts or priorities of zero.
//!
//! Pure computation: no I/O, no shared state.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::customers::Customer;
use crate::pricing::error::{PricingError, PricingResult};
use crate::pricing::models::PricingRule;
use crate::pricing::types::RuleType;

/// Name reported when no rule beats the customer's baseline.
pub const BASELINE_RULE_NAME: &str = "Customer group discount";

/// Outcome of resolving one line.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceResolution {
    pub b2b_customer: bool,
    pub original_price: Decimal,
    pub final_price: Decimal,
    /// Percentage points applied
    pub discount: Decimal,
    pub discount_amount: Decimal,
    pub applied_rule: Option<String>,
}

impl PriceResolution {
    fn retail(original_price: Decimal) -> Self {
        Self {
            b2b_customer: false,
            original_price,
            final_price: original_price,
            discount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            applied_rule: None,
        }
    }
}

/// Round to the currency minor unit, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Resolve the price of one line.
///
/// `quantity` defaults to 1. A negative price or a quantity below 1 is a
/// [`PricingError::Validation`]. Unknown and non-approved customers pay the
/// original price.
pub fn resolve_price(
    customer: Option<&Customer>,
    rules: &[PricingRule],
    quantity: Option<i32>,
    original_price: Decimal,
    now: DateTime<Utc>,
) -> PricingResult<PriceResolution> {
    if original_price.is_sign_negative() && !original_price.is_zero() {
        return Err(PricingError::Validation(
            "original_price must be a non-negative number".to_string(),
        ));
    }
    let quantity = quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(PricingError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }

    let customer = match customer {
        Some(customer) if customer.is_b2b() => customer,
        _ => return Ok(PriceResolution::retail(original_price)),
    };

    let mut best_discount = customer.discount_percentage;
    let mut applied_rule = BASELINE_RULE_NAME;

    for rule in rules.iter().filter(|rule| rule.is_eligible(customer, quantity, now)) {
        let discount = rule_discount_percent(rule, original_price)?;
        if discount > best_discount || (discount == best_discount && rule.priority > 0) {
            best_discount = discount;
            applied_rule = rule.name.as_str();
        }
    }

    let unrounded = Decimal::ONE_HUNDRED
        .checked_sub(best_discount)
        .map(|remaining| remaining / Decimal::ONE_HUNDRED)
        .and_then(|multiplier| original_price.checked_mul(multiplier))
        .ok_or_else(|| PricingError::Calculation("final price overflow".to_string()))?;
    let discount_amount = original_price
        .checked_sub(unrounded)
        .ok_or_else(|| PricingError::Calculation("discount amount overflow".to_string()))?;

    Ok(PriceResolution {
        b2b_customer: true,
        original_price,
        final_price: round_currency(unrounded),
        discount: best_discount,
        discount_amount: round_currency(discount_amount),
        applied_rule: Some(applied_rule.to_string()),
    })
}

/// Percentage equivalent of a rule for a line at `original_price`.
///
/// `fixed_price` rules have no percentage equivalent and count as 0%; they are
/// stored and listed but never lower a price on their own.
fn rule_discount_percent(rule: &PricingRule, original_price: Decimal) -> PricingResult<Decimal> {
    match rule.rule_type {
        RuleType::Percentage => Ok(rule.value),
        RuleType::FixedDiscount => {
            if original_price.is_zero() {
                return Ok(Decimal::ZERO);
            }
            rule.value
                .checked_div(original_price)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| {
                    PricingError::Calculation(format!(
                        "discount of rule '{}' is out of range for price {}",
                        rule.name, original_price
                    ))
                })
        }
        RuleType::FixedPrice => Ok(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customers::models::fixtures::{approved_customer, customer_with_status};
    use crate::customers::CustomerStatus;
    use crate::pricing::models::fixtures::{percentage_rule, rule_of_type};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_baseline_discount_only() {
        let customer = approved_customer(1, "buyer@example.com", dec!(15));
        let result = resolve_price(Some(&customer), &[], Some(1), dec!(100), now()).unwrap();

        assert!(result.b2b_customer);
        assert_eq!(result.final_price, dec!(85.00));
        assert_eq!(result.discount, dec!(15));
        assert_eq!(result.discount_amount, dec!(15.00));
        assert_eq!(result.applied_rule.as_deref(), Some(BASELINE_RULE_NAME));
    }

    #[test]
    fn test_larger_rule_beats_baseline() {
        let customer = approved_customer(1, "buyer@example.com", dec!(15));
        let rules = vec![percentage_rule(1, "Twenty off", dec!(20))];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(100), now()).unwrap();

        assert_eq!(result.final_price, dec!(80.00));
        assert_eq!(result.discount, dec!(20));
        assert_eq!(result.applied_rule.as_deref(), Some("Twenty off"));
    }

    #[test]
    fn test_smaller_rule_keeps_baseline() {
        let customer = approved_customer(1, "buyer@example.com", dec!(15));
        let rules = vec![percentage_rule(1, "Ten off", dec!(10))];
        let result = resolve_price(Some(&customer), &rules, None, dec!(100), now()).unwrap();

        assert_eq!(result.final_price, dec!(85.00));
        assert_eq!(result.applied_rule.as_deref(), Some(BASELINE_RULE_NAME));
    }

    #[test]
    fn test_fixed_discount_as_percentage_of_line() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let rules = vec![rule_of_type(1, "Ten dollars off", RuleType::FixedDiscount, dec!(10))];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(50), now()).unwrap();

        assert_eq!(result.discount, dec!(20));
        assert_eq!(result.final_price, dec!(40.00));
    }

    #[test]
    fn test_fixed_discount_on_free_item_contributes_nothing() {
        let customer = approved_customer(1, "buyer@example.com", dec!(5));
        let rules = vec![rule_of_type(1, "Ten dollars off", RuleType::FixedDiscount, dec!(10))];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(0), now()).unwrap();

        assert_eq!(result.final_price, dec!(0));
        assert_eq!(result.discount, dec!(5));
        assert_eq!(result.applied_rule.as_deref(), Some(BASELINE_RULE_NAME));
    }

    #[test]
    fn test_fixed_price_rule_does_not_lower_price() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let rules = vec![rule_of_type(1, "Target 30", RuleType::FixedPrice, dec!(30))];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(50), now()).unwrap();

        assert_eq!(result.final_price, dec!(50.00));
        assert_eq!(result.discount, dec!(0));
        assert_eq!(result.applied_rule.as_deref(), Some(BASELINE_RULE_NAME));
    }

    #[test]
    fn test_fixed_price_rule_with_priority_wins_zero_tie() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let rules = vec![PricingRule {
            priority: 1,
            ..rule_of_type(1, "Target 30", RuleType::FixedPrice, dec!(30))
        }];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(50), now()).unwrap();

        // Named as the winner, but the price is unchanged.
        assert_eq!(result.applied_rule.as_deref(), Some("Target 30"));
        assert_eq!(result.final_price, dec!(50.00));
    }

    #[test]
    fn test_equal_discount_positive_priority_wins() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let plain = percentage_rule(1, "Plain", dec!(15));
        let preferred = PricingRule {
            priority: 1,
            ..percentage_rule(2, "Preferred", dec!(15))
        };

        for rules in [vec![plain.clone(), preferred.clone()], vec![preferred.clone(), plain.clone()]] {
            let result = resolve_price(Some(&customer), &rules, Some(1), dec!(100), now()).unwrap();
            assert_eq!(result.applied_rule.as_deref(), Some("Preferred"));
            assert_eq!(result.final_price, dec!(85.00));
        }
    }

    #[test]
    fn test_equal_discount_zero_priority_keeps_baseline() {
        let customer = approved_customer(1, "buyer@example.com", dec!(15));
        let rules = vec![percentage_rule(1, "Same as baseline", dec!(15))];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(100), now()).unwrap();
        assert_eq!(result.applied_rule.as_deref(), Some(BASELINE_RULE_NAME));
    }

    #[test]
    fn test_min_quantity_boundary() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let rules = vec![PricingRule {
            min_quantity: 10,
            ..percentage_rule(1, "Case of ten", dec!(10))
        }];

        let below = resolve_price(Some(&customer), &rules, Some(9), dec!(100), now()).unwrap();
        assert_eq!(below.discount, dec!(0));

        let at = resolve_price(Some(&customer), &rules, Some(10), dec!(100), now()).unwrap();
        assert_eq!(at.discount, dec!(10));
        assert_eq!(at.final_price, dec!(90.00));
    }

    #[test]
    fn test_end_date_boundary() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let today = now();
        let expired = PricingRule {
            end_date: Some(today - Duration::days(1)),
            ..percentage_rule(1, "Expired", dec!(10))
        };
        let running = PricingRule {
            end_date: Some(today + Duration::days(1)),
            ..percentage_rule(2, "Running", dec!(5))
        };

        let result = resolve_price(Some(&customer), &[expired], Some(1), dec!(100), today).unwrap();
        assert_eq!(result.discount, dec!(0));

        let result = resolve_price(Some(&customer), &[running], Some(1), dec!(100), today).unwrap();
        assert_eq!(result.discount, dec!(5));
    }

    #[test]
    fn test_unknown_customer_pays_full_price() {
        let rules = vec![percentage_rule(1, "Everyone", dec!(50))];
        let result = resolve_price(None, &rules, Some(1), dec!(42.50), now()).unwrap();

        assert!(!result.b2b_customer);
        assert_eq!(result.final_price, dec!(42.50));
        assert_eq!(result.discount, dec!(0));
        assert_eq!(result.applied_rule, None);
    }

    #[test]
    fn test_pending_and_rejected_customers_pay_full_price() {
        let rules = vec![percentage_rule(1, "Everyone", dec!(50))];
        for status in [CustomerStatus::Pending, CustomerStatus::Rejected] {
            let customer = customer_with_status(1, "buyer@example.com", status);
            let result = resolve_price(Some(&customer), &rules, Some(1), dec!(100), now()).unwrap();
            assert!(!result.b2b_customer);
            assert_eq!(result.final_price, dec!(100));
        }
    }

    #[test]
    fn test_discount_over_100_is_not_clamped() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let rules = vec![percentage_rule(1, "Misconfigured", dec!(120))];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(100), now()).unwrap();
        assert_eq!(result.final_price, dec!(-20.00));
    }

    #[test]
    fn test_huge_discount_on_huge_price_is_calculation_error() {
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let rules = vec![percentage_rule(1, "Misconfigured", dec!(199))];
        let price = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let result = resolve_price(Some(&customer), &rules, Some(1), price, now());
        assert!(matches!(result, Err(PricingError::Calculation(_))));
    }

    #[test]
    fn test_half_up_rounding() {
        let customer = approved_customer(1, "buyer@example.com", dec!(15));
        // 0.85 * 10.99 = 9.3415
        let result = resolve_price(Some(&customer), &[], Some(1), dec!(10.99), now()).unwrap();
        assert_eq!(result.final_price, dec!(9.34));

        // 0.5 * 0.05 = 0.025
        let customer = approved_customer(1, "buyer@example.com", dec!(50));
        let result = resolve_price(Some(&customer), &[], Some(1), dec!(0.05), now()).unwrap();
        assert_eq!(result.final_price, dec!(0.03));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = resolve_price(None, &[], Some(1), dec!(-1), now());
        assert!(matches!(result, Err(PricingError::Validation(_))));
    }

    #[test]
    fn test_quantity_below_one_rejected() {
        let customer = approved_customer(1, "buyer@example.com", dec!(15));
        assert!(matches!(
            resolve_price(Some(&customer), &[], Some(0), dec!(10), now()),
            Err(PricingError::Validation(_))
        ));
        assert!(matches!(
            resolve_price(Some(&customer), &[], Some(-3), dec!(10), now()),
            Err(PricingError::Validation(_))
        ));
    }

    #[test]
    fn test_orphaned_group_rule_ignored() {
        // Group already resolved to None by the caller.
        let customer = approved_customer(1, "buyer@example.com", dec!(0));
        let rules = vec![PricingRule {
            customer_group_id: Some(99),
            ..percentage_rule(1, "Deleted tier", dec!(30))
        }];
        let result = resolve_price(Some(&customer), &rules, Some(1), dec!(100), now()).unwrap();
        assert_eq!(result.discount, dec!(0));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn price() -> impl Strategy<Value = Decimal> {
            (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
        }

        fn percent() -> impl Strategy<Value = Decimal> {
            (0i64..10_000).prop_map(|basis| Decimal::new(basis, 2))
        }

        proptest! {
            #[test]
            fn prop_non_b2b_customers_pay_original(
                original in price(),
                quantity in 1i32..1000,
                rule_discount in percent(),
                status in prop_oneof![Just(CustomerStatus::Pending), Just(CustomerStatus::Rejected)],
            ) {
                let customer = customer_with_status(1, "buyer@example.com", status);
                let rules = vec![percentage_rule(1, "Any", rule_discount)];

                for candidate in [None, Some(&customer)] {
                    let result = resolve_price(candidate, &rules, Some(quantity), original, Utc::now()).unwrap();
                    prop_assert_eq!(result.final_price, original);
                    prop_assert_eq!(result.discount, Decimal::ZERO);
                    prop_assert!(!result.b2b_customer);
                }
            }

            #[test]
            fn prop_final_price_matches_discount(
                original in price(),
                baseline in percent(),
                discounts in prop::collection::vec((percent(), 0i32..3), 0..6),
            ) {
                let customer = approved_customer(1, "buyer@example.com", baseline);
                let rules: Vec<PricingRule> = discounts
                    .iter()
                    .enumerate()
                    .map(|(i, (value, priority))| PricingRule {
                        priority: *priority,
                        ..percentage_rule(i as i32, &format!("rule-{}", i), *value)
                    })
                    .collect();

                let result = resolve_price(Some(&customer), &rules, Some(1), original, Utc::now()).unwrap();
                let expected = round_currency(
                    original * (Decimal::ONE_HUNDRED - result.discount) / Decimal::ONE_HUNDRED,
                );
                prop_assert_eq!(result.final_price, expected);

                let max_rule = discounts.iter().map(|(value, _)| *value).max().unwrap_or(Decimal::ZERO);
                prop_assert_eq!(result.discount, baseline.max(max_rule));
            }

            #[test]
            fn prop_resolution_is_idempotent(
                original in price(),
                baseline in percent(),
                quantity in 1i32..50,
                min_quantity in 1i32..50,
                value in percent(),
            ) {
                let customer = approved_customer(1, "buyer@example.com", baseline);
                let rules = vec![PricingRule {
                    min_quantity,
                    ..percentage_rule(1, "Bulk", value)
                }];
                let now = Utc::now();

                let first = resolve_price(Some(&customer), &rules, Some(quantity), original, now).unwrap();
                let second = resolve_price(Some(&customer), &rules, Some(quantity), original, now).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn prop_winner_independent_of_order_for_distinct_discounts(
                original in price(),
                basis_points in prop::collection::btree_set(0i64..10_000, 1..6),
            ) {
                let customer = approved_customer(1, "buyer@example.com", Decimal::ZERO);
                let values: Vec<Decimal> = basis_points
                    .into_iter()
                    .map(|basis| Decimal::new(basis, 2))
                    .collect();
                let rules: Vec<PricingRule> = values
                    .iter()
                    .enumerate()
                    .map(|(i, value)| percentage_rule(i as i32, &format!("rule-{}", i), *value))
                    .collect();
                let mut reversed = rules.clone();
                reversed.reverse();

                let forward = resolve_price(Some(&customer), &rules, Some(1), original, Utc::now()).unwrap();
                let backward = resolve_price(Some(&customer), &reversed, Some(1), original, Utc::now()).unwrap();
                prop_assert_eq!(forward.applied_rule, backward.applied_rule);
                prop_assert_eq!(forward.final_price, backward.final_price);
            }
        }
    }
}

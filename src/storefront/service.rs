use chrono::Utc;
use tracing::debug;

use crate::customers::Customer;
use crate::pricing::error::PricingResult;
use crate::pricing::order_limits::validate_order;
use crate::pricing::resolver::resolve_price;
use crate::pricing::store::RuleStore;
use crate::storefront::models::{
    CartValidationRequest, CartValidationResponse, CustomerStatusResponse,
    PriceCalculationRequest, PriceCalculationResponse, StorefrontCustomer,
};

/// Price lookups and cart checks for storefront and admin preview calls.
///
/// Fetches inputs from the injected [`RuleStore`] and hands them to the pure
/// resolver and order-limit check.
pub struct StorefrontService<S> {
    store: S,
}

impl<S: RuleStore> StorefrontService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn calculate_price(
        &self,
        request: &PriceCalculationRequest,
    ) -> PricingResult<PriceCalculationResponse> {
        let customer = self.lookup_customer(request.customer_email.as_deref()).await?;

        let rules = match &customer {
            Some(customer) if customer.is_b2b() => self.store.list_active_rules().await?,
            _ => Vec::new(),
        };

        let resolution = resolve_price(
            customer.as_ref(),
            &rules,
            request.quantity,
            request.original_price,
            Utc::now(),
        )?;

        debug!(
            "Priced line for {:?}: {} -> {} ({:?})",
            request.customer_email, resolution.original_price, resolution.final_price, resolution.applied_rule
        );

        Ok(PriceCalculationResponse::new(resolution, customer.as_ref()))
    }

    pub async fn validate_cart(
        &self,
        request: &CartValidationRequest,
    ) -> PricingResult<CartValidationResponse> {
        let customer = self.lookup_customer(request.customer_email.as_deref()).await?;

        let global_minimum = match &customer {
            Some(customer) if customer.is_b2b() => self.store.global_minimum_order_value().await?,
            _ => None,
        };

        let check = validate_order(customer.as_ref(), request.total_amount, global_minimum)?;

        if !check.valid {
            debug!("Cart for {:?} failed limits: {:?}", request.customer_email, check.errors);
        }

        Ok(CartValidationResponse::new(check, customer.as_ref()))
    }

    pub async fn customer_status(&self, email: Option<&str>) -> PricingResult<CustomerStatusResponse> {
        let customer = self.lookup_customer(email).await?;

        Ok(match customer {
            Some(customer) if customer.is_b2b() => CustomerStatusResponse {
                is_b2b: true,
                customer: Some(StorefrontCustomer::from(&customer)),
            },
            _ => CustomerStatusResponse {
                is_b2b: false,
                customer: None,
            },
        })
    }

    /// Look up a customer by email and resolve its group.
    ///
    /// A missing or blank email is the retail path. A customer whose group no
    /// longer exists is returned with `group_id = None`.
    async fn lookup_customer(&self, email: Option<&str>) -> PricingResult<Option<Customer>> {
        let email = match email.map(str::trim) {
            Some(email) if !email.is_empty() => email,
            _ => return Ok(None),
        };

        let Some(mut customer) = self.store.find_customer_by_email(email).await? else {
            debug!("No wholesale customer for {}", email);
            return Ok(None);
        };

        if let Some(group_id) = customer.group_id {
            if self.store.get_group(group_id).await?.is_none() {
                debug!("Customer {} references missing group {}", customer.id, group_id);
                customer.group_id = None;
            }
        }

        Ok(Some(customer))
    }
}

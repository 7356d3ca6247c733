use tracing::{debug, info};

use crate::customers::CustomerRepository;
use crate::error::ApiError;
use crate::orders::{ApprovalMachine, ApprovalStatus, B2bOrder, OrdersRepository, RecordOrderRequest};
use crate::settings::{SettingsRepository, AUTO_APPROVE_ORDERS};

/// Actor recorded on orders approved by the `auto_approve_orders` setting
pub const AUTO_APPROVER: &str = "auto";

/// Service for wholesale order approval
#[derive(Clone)]
pub struct OrderService {
    orders: OrdersRepository,
    customers: CustomerRepository,
    settings: SettingsRepository,
}

impl OrderService {
    pub fn new(
        orders: OrdersRepository,
        customers: CustomerRepository,
        settings: SettingsRepository,
    ) -> Self {
        Self {
            orders,
            customers,
            settings,
        }
    }

    pub fn orders(&self) -> &OrdersRepository {
        &self.orders
    }

    /// Record an order placed by a known wholesale customer
    ///
    /// The order starts approved when `auto_approve_orders` is on, pending otherwise.
    pub async fn record_order(&self, request: &RecordOrderRequest) -> Result<B2bOrder, ApiError> {
        let customer = self
            .customers
            .find_by_email(&request.customer_email)
            .await?
            .ok_or_else(|| ApiError::not_found("Customer", &request.customer_email))?;

        let auto_approve = self.settings.flag(AUTO_APPROVE_ORDERS).await?;
        let (status, approved_by) = initial_decision(auto_approve);

        let order = self
            .orders
            .create(
                customer.id,
                request.shopify_order_id.as_deref(),
                request.order_number.as_deref(),
                request.total_amount,
                status,
                approved_by,
            )
            .await?;

        info!("Recorded order {} for customer {} ({})", order.id, customer.id, status);
        Ok(order)
    }

    pub async fn approve(&self, id: i32, actor: &str) -> Result<B2bOrder, ApiError> {
        self.decide(id, ApprovalStatus::Approved, actor, None).await
    }

    pub async fn reject(&self, id: i32, actor: &str, reason: &str) -> Result<B2bOrder, ApiError> {
        self.decide(id, ApprovalStatus::Rejected, actor, Some(reason))
            .await
    }

    async fn decide(
        &self,
        id: i32,
        to: ApprovalStatus,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<B2bOrder, ApiError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", id))?;

        ApprovalMachine::transition(order.approval_status, to).map_err(ApiError::conflict)?;

        if order.approval_status == to {
            debug!("Order {} already {}", id, to);
            return Ok(order);
        }

        let order = self
            .orders
            .decide(id, to, actor, reason)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", id))?;

        info!("Order {} {} by {}", id, to, actor);
        Ok(order)
    }
}

fn initial_decision(auto_approve: bool) -> (ApprovalStatus, Option<&'static str>) {
    if auto_approve {
        (ApprovalStatus::Approved, Some(AUTO_APPROVER))
    } else {
        (ApprovalStatus::Pending, None)
    }
}

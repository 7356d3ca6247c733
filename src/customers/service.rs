use tracing::info;

use crate::customers::models::{Customer, CustomerStatus};
use crate::customers::repository::CustomerRepository;
use crate::error::ApiError;
use crate::groups::{CustomerGroup, GroupRepository};

/// Approval and group assignment for wholesale customers.
#[derive(Clone)]
pub struct CustomerService {
    customers: CustomerRepository,
    groups: GroupRepository,
}

impl CustomerService {
    pub fn new(customers: CustomerRepository, groups: GroupRepository) -> Self {
        Self { customers, groups }
    }

    pub fn customers(&self) -> &CustomerRepository {
        &self.customers
    }

    /// Approve a customer, optionally placing it in a group in the same step.
    pub async fn approve(
        &self,
        id: i32,
        group_id: Option<i32>,
        actor: &str,
    ) -> Result<Customer, ApiError> {
        let group = match group_id {
            Some(group_id) => Some(self.find_group(group_id).await?),
            None => None,
        };

        let customer = self
            .customers
            .decide(id, CustomerStatus::Approved, group.as_ref(), actor)
            .await?
            .ok_or_else(|| ApiError::not_found("Customer", id))?;

        info!("Customer {} approved by {}", id, actor);
        Ok(customer)
    }

    pub async fn reject(&self, id: i32, actor: &str) -> Result<Customer, ApiError> {
        let customer = self
            .customers
            .decide(id, CustomerStatus::Rejected, None, actor)
            .await?
            .ok_or_else(|| ApiError::not_found("Customer", id))?;

        info!("Customer {} rejected by {}", id, actor);
        Ok(customer)
    }

    /// Assign (`Some`) or remove (`None`) the customer's group.
    ///
    /// The group's terms are copied onto the customer. A pending customer
    /// assigned to an auto-approve group is approved in the same call.
    pub async fn assign_group(
        &self,
        id: i32,
        group_id: Option<i32>,
        actor: &str,
    ) -> Result<Customer, ApiError> {
        let group = match group_id {
            Some(group_id) => Some(self.find_group(group_id).await?),
            None => None,
        };

        let customer = self
            .customers
            .assign_group(id, group.as_ref(), actor)
            .await?
            .ok_or_else(|| ApiError::not_found("Customer", id))?;

        match group {
            Some(group) => info!(
                "Customer {} assigned to group {} (status {})",
                id, group.name, customer.status
            ),
            None => info!("Customer {} removed from its group", id),
        }
        Ok(customer)
    }

    async fn find_group(&self, id: i32) -> Result<CustomerGroup, ApiError> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Customer group", id))
    }
}


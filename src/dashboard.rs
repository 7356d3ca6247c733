// Admin dashboard counters

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::ShopSession;
use crate::customers::{CustomerRepository, CustomerStatus};
use crate::error::ApiError;
use crate::orders::OrdersRepository;
use crate::quotes::{QuoteRepository, QuoteStatus};
use crate::AppState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_customers: i64,
    pub pending_customers: i64,
    pub approved_customers: i64,
    pub rejected_customers: i64,
    pub customer_groups: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub pending_quotes: i64,
}

impl DashboardStats {
    fn with_customer_counts(mut self, counts: &[(CustomerStatus, i64)]) -> Self {
        for (status, count) in counts {
            match status {
                CustomerStatus::Pending => self.pending_customers += count,
                CustomerStatus::Approved => self.approved_customers += count,
                CustomerStatus::Rejected => self.rejected_customers += count,
            }
            self.total_customers += count;
        }
        self
    }
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Counts for the admin dashboard", body = DashboardStats),
        (status = 401, description = "Missing or invalid session token")
    ),
    tag = "dashboard"
)]
pub async fn stats_handler(
    State(state): State<AppState>,
    _session: ShopSession,
) -> Result<Json<DashboardStats>, ApiError> {
    let customer_counts = CustomerRepository::new(state.db.clone())
        .count_by_status()
        .await?;
    let customer_groups: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer_groups")
        .fetch_one(&state.db)
        .await?;
    let (total_orders, pending_orders) = OrdersRepository::new(state.db.clone()).counts().await?;
    let pending_quotes = QuoteRepository::new(state.db.clone())
        .count_by_status(QuoteStatus::Pending)
        .await?;

    Ok(Json(
        DashboardStats {
            customer_groups,
            total_orders,
            pending_orders,
            pending_quotes,
            ..DashboardStats::default()
        }
        .with_customer_counts(&customer_counts),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_counts_are_totalled() {
        let stats = DashboardStats::default().with_customer_counts(&[
            (CustomerStatus::Pending, 3),
            (CustomerStatus::Approved, 10),
            (CustomerStatus::Rejected, 1),
        ]);
        assert_eq!(stats.total_customers, 14);
        assert_eq!(stats.pending_customers, 3);
        assert_eq!(stats.approved_customers, 10);
        assert_eq!(stats.rejected_customers, 1);
    }

    #[test]
    fn test_missing_statuses_count_as_zero() {
        let stats = DashboardStats::default().with_customer_counts(&[(CustomerStatus::Approved, 2)]);
        assert_eq!(stats.pending_customers, 0);
        assert_eq!(stats.total_customers, 2);
    }
}

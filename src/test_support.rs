// In-memory RuleStore for unit and HTTP tests, and a throwaway PostgreSQL for
// repository tests

use chrono::Utc;
use rust_decimal::Decimal;

use crate::customers::Customer;
use crate::groups::CustomerGroup;
use crate::pricing::error::PricingResult;
use crate::pricing::models::PricingRule;
use crate::pricing::store::RuleStore;
use crate::validation::normalize_email;

#[derive(Debug, Clone, Default)]
pub struct InMemoryRuleStore {
    customers: Vec<Customer>,
    groups: Vec<CustomerGroup>,
    rules: Vec<PricingRule>,
    global_minimum: Option<Decimal>,
}

impl InMemoryRuleStore {
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.push(customer);
        self
    }

    pub fn with_group(mut self, group: CustomerGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_rule(mut self, rule: PricingRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_global_minimum(mut self, minimum: Decimal) -> Self {
        self.global_minimum = Some(minimum);
        self
    }
}

impl RuleStore for InMemoryRuleStore {
    async fn find_customer_by_email(&self, email: &str) -> PricingResult<Option<Customer>> {
        let email = normalize_email(email);
        Ok(self
            .customers
            .iter()
            .find(|customer| normalize_email(&customer.email) == email)
            .cloned())
    }

    async fn list_active_rules(&self) -> PricingResult<Vec<PricingRule>> {
        Ok(self.rules.iter().filter(|rule| rule.active).cloned().collect())
    }

    async fn get_group(&self, id: i32) -> PricingResult<Option<CustomerGroup>> {
        Ok(self.groups.iter().find(|group| group.id == id).cloned())
    }

    async fn global_minimum_order_value(&self) -> PricingResult<Option<Decimal>> {
        Ok(self.global_minimum.filter(|minimum| *minimum > Decimal::ZERO))
    }
}

pub fn group(id: i32, name: &str) -> CustomerGroup {
    let now = Utc::now();
    CustomerGroup {
        id,
        name: name.to_string(),
        description: None,
        discount_percentage: Decimal::new(20, 0),
        minimum_order_value: Decimal::ZERO,
        maximum_order_value: None,
        payment_terms: "net_30".to_string(),
        auto_approve: false,
        created_at: now,
        updated_at: now,
    }
}

pub mod postgres {
    use std::time::Duration;

    use sqlx::PgPool;
    use testcontainers::{
        core::{IntoContainerPort, WaitFor},
        runners::AsyncRunner,
        ContainerAsync, GenericImage, ImageExt,
    };

    /// Migrated database that lives as long as this value.
    pub struct TestDatabase {
        pub pool: PgPool,
        _container: ContainerAsync<GenericImage>,
    }

    pub async fn start() -> TestDatabase {
        // The ready line is printed once by the init server and again by the real one.
        let container = GenericImage::new("postgres", "16")
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stdout(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", "b2b")
            .with_env_var("POSTGRES_PASSWORD", "b2b")
            .with_env_var("POSTGRES_DB", "b2b_wholesale")
            .with_startup_timeout(Duration::from_secs(60))
            .start()
            .await
            .expect("Failed to start postgres container");

        tokio::time::sleep(Duration::from_secs(1)).await;

        let host = container.get_host().await.expect("Failed to get container host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get mapped port");
        let url = format!("postgres://b2b:b2b@{}:{}/b2b_wholesale", host, port);

        let pool = PgPool::connect(&url).await.expect("Failed to connect to PostgreSQL");
        crate::db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        TestDatabase {
            pool,
            _container: container,
        }
    }
}

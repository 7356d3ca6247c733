use sqlx::PgPool;

use crate::error::ApiError;
use crate::settings::models::{parse_flag, AppSettings, UpdateSettingsRequest};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn load(&self) -> Result<AppSettings, ApiError> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM app_settings")
            .fetch_all(&self.pool)
            .await?;

        Ok(AppSettings::from_pairs(
            rows.iter().map(|(key, value)| (key.as_str(), value.as_str())),
        ))
    }

    /// A single boolean setting; missing rows read as `false`.
    pub async fn flag(&self, key: &str) -> Result<bool, ApiError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM app_settings WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value.as_deref().is_some_and(parse_flag))
    }

    /// Upsert the present fields in one transaction and return the result.
    pub async fn update(&self, request: &UpdateSettingsRequest) -> Result<AppSettings, ApiError> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in request.to_pairs() {
            sqlx::query(
                r#"
                INSERT INTO app_settings (key, value, updated_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::models::{APPROVAL_REQUIRED, MIN_ORDER_VALUE};
    use crate::test_support::postgres;
    use rust_decimal_macros::dec;

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_seeded_defaults() {
        let db = postgres::start().await;
        let repo = SettingsRepository::new(db.pool.clone());

        assert_eq!(repo.load().await.unwrap(), AppSettings::default());
        assert!(repo.flag(APPROVAL_REQUIRED).await.unwrap());
        assert!(!repo.flag("no_such_flag").await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn test_update_upserts_present_fields() {
        let db = postgres::start().await;
        let repo = SettingsRepository::new(db.pool.clone());

        // A row missing from the seed is inserted rather than skipped.
        sqlx::query("DELETE FROM app_settings WHERE key = $1")
            .bind(MIN_ORDER_VALUE)
            .execute(&db.pool)
            .await
            .unwrap();

        let request = UpdateSettingsRequest {
            auto_approve_orders: Some(true),
            min_order_value: Some(dec!(250.00)),
            notification_email: Some(" orders@example.com ".to_string()),
            ..Default::default()
        };
        let settings = repo.update(&request).await.unwrap();

        assert!(settings.approval_required);
        assert!(settings.auto_approve_orders);
        assert_eq!(settings.min_order_value, dec!(250));
        assert_eq!(settings.notification_email, "orders@example.com");
        assert_eq!(settings.terms_and_conditions, "");

        let stored: String =
            sqlx::query_scalar("SELECT value FROM app_settings WHERE key = $1")
                .bind(MIN_ORDER_VALUE)
                .fetch_one(&db.pool)
                .await
                .unwrap();
        assert_eq!(stored, "250");
    }
}

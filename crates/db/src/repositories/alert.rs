//! ScraperAlert repository.

use crate::models::alert::{CreateScraperAlert, ScraperAlert};
use crate::DbPool;
use sqlx::Error as SqlxError;
use uuid::Uuid;

#[derive(Clone)]
pub struct AlertRepository {
    pool: DbPool,
}

impl AlertRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: CreateScraperAlert) -> Result<ScraperAlert, SqlxError> {
        sqlx::query_as::<_, ScraperAlert>(
            r#"
            INSERT INTO scraper_alerts
                (source_site, alert_type, field_name, error_count, error_rate, message,
                 created_at, is_resolved)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), false)
            RETURNING *
            "#,
        )
        .bind(data.source_site)
        .bind(data.alert_type)
        .bind(&data.field_name)
        .bind(data.error_count)
        .bind(data.error_rate)
        .bind(&data.message)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_unresolved(&self) -> Result<Vec<ScraperAlert>, SqlxError> {
        sqlx::query_as::<_, ScraperAlert>(
            "SELECT * FROM scraper_alerts WHERE is_resolved = false ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn resolve(&self, id: Uuid) -> Result<(), SqlxError> {
        sqlx::query(
            "UPDATE scraper_alerts SET is_resolved = true, resolved_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

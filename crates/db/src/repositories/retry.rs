//! Retry-gate persistence (§4.3). This repository only stores and
//! increments records; the back-off schedule and gating decision live in
//! the `retry-gate` crate, which is the component that actually
//! interprets these rows.

use crate::models::retry::{PriceMismatchRetry, Url404Retry, ValidationErrorRetry};
use crate::DbPool;
use chrono::{DateTime, Utc};
use common::SourceSite;
use sqlx::Error as SqlxError;

#[derive(Clone)]
pub struct RetryRepository {
    pool: DbPool,
}

impl RetryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_404(
        &self,
        source_site: SourceSite,
        url: &str,
    ) -> Result<Option<Url404Retry>, SqlxError> {
        sqlx::query_as::<_, Url404Retry>(
            "SELECT * FROM url_404_retries WHERE source_site = $1 AND url = $2",
        )
        .bind(source_site)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert a fresh record at `error_count = 1`, or bump an existing
    /// one's `error_count` and `last_error_at`.
    pub async fn record_404(
        &self,
        source_site: SourceSite,
        url: &str,
    ) -> Result<Url404Retry, SqlxError> {
        sqlx::query_as::<_, Url404Retry>(
            r#"
            INSERT INTO url_404_retries (source_site, url, error_count, last_error_at)
            VALUES ($1, $2, 1, NOW())
            ON CONFLICT (source_site, url) DO UPDATE
            SET error_count = url_404_retries.error_count + 1, last_error_at = NOW()
            RETURNING *
            "#,
        )
        .bind(source_site)
        .bind(url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_validation(
        &self,
        source_site: SourceSite,
        url: &str,
        error_type: &str,
    ) -> Result<Option<ValidationErrorRetry>, SqlxError> {
        sqlx::query_as::<_, ValidationErrorRetry>(
            "SELECT * FROM url_validation_error_retries \
             WHERE source_site = $1 AND url = $2 AND error_type = $3",
        )
        .bind(source_site)
        .bind(url)
        .bind(error_type)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn record_validation(
        &self,
        source_site: SourceSite,
        url: &str,
        error_type: &str,
        error_details: Option<serde_json::Value>,
    ) -> Result<ValidationErrorRetry, SqlxError> {
        sqlx::query_as::<_, ValidationErrorRetry>(
            r#"
            INSERT INTO url_validation_error_retries
                (source_site, url, error_type, error_details, error_count, last_error_at)
            VALUES ($1, $2, $3, $4, 1, NOW())
            ON CONFLICT (source_site, url, error_type) DO UPDATE
            SET error_count = url_validation_error_retries.error_count + 1,
                error_details = $4,
                last_error_at = NOW()
            RETURNING *
            "#,
        )
        .bind(source_site)
        .bind(url)
        .bind(error_type)
        .bind(error_details)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_price_mismatch(
        &self,
        source_site: SourceSite,
        site_property_id: &str,
    ) -> Result<Option<PriceMismatchRetry>, SqlxError> {
        sqlx::query_as::<_, PriceMismatchRetry>(
            "SELECT * FROM price_mismatch_history \
             WHERE source_site = $1 AND site_property_id = $2 AND is_resolved = false \
             ORDER BY attempted_at DESC LIMIT 1",
        )
        .bind(source_site)
        .bind(site_property_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn record_price_mismatch(
        &self,
        source_site: SourceSite,
        site_property_id: &str,
        property_url: &str,
        list_price: i64,
        detail_price: i64,
        retry_after: DateTime<Utc>,
    ) -> Result<PriceMismatchRetry, SqlxError> {
        sqlx::query_as::<_, PriceMismatchRetry>(
            r#"
            INSERT INTO price_mismatch_history
                (source_site, site_property_id, property_url, list_price, detail_price,
                 attempted_at, retry_after, is_resolved)
            VALUES ($1, $2, $3, $4, $5, NOW(), $6, false)
            RETURNING *
            "#,
        )
        .bind(source_site)
        .bind(site_property_id)
        .bind(property_url)
        .bind(list_price)
        .bind(detail_price)
        .bind(retry_after)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn resolve_price_mismatch(&self, id: uuid::Uuid) -> Result<(), SqlxError> {
        sqlx::query("UPDATE price_mismatch_history SET is_resolved = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

//! Gate decisions for detail fetches and revisits (§4.3).
//!
//! The gate is queried before a detail fetch and before deciding whether to
//! revisit a known-stale listing. A scrape run configured with
//! `ignore_error_history` bypasses every gate and never writes a new
//! record. A run configured with `force_detail_fetch` bypasses the gate
//! for the fetch decision only — failures are still recorded, so the
//! back-off schedule keeps advancing even while it is being overridden.

use crate::backoff::backoff_duration;
use crate::error::RetryGateError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use common::SourceSite;
use db::repositories::retry::RetryRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct RetryGate {
    repo: RetryRepository,
    price_mismatch_retry_days: i64,
}

impl RetryGate {
    pub fn new(repo: RetryRepository, price_mismatch_retry_days: i64) -> Self {
        Self {
            repo,
            price_mismatch_retry_days,
        }
    }

    /// Whether a detail fetch for `(source_site, url)` should be skipped
    /// because the URL is within its 404 back-off window.
    ///
    /// `ignore_error_history` and `force_detail_fetch` both bypass this
    /// check; the caller decides which applies, this method only answers
    /// the un-overridden question.
    pub async fn is_404_gated(
        &self,
        source_site: SourceSite,
        url: &str,
    ) -> Result<bool, RetryGateError> {
        match self.repo.find_404(source_site, url).await? {
            Some(record) => {
                let wait = ChronoDuration::from_std(backoff_duration(record.error_count))
                    .unwrap_or(ChronoDuration::max_value());
                Ok(Utc::now() < record.last_error_at + wait)
            }
            None => Ok(false),
        }
    }

    /// Combines `is_404_gated` with the per-run override flags into the
    /// single yes/no decision the orchestrator actually needs before a
    /// detail fetch.
    pub async fn should_fetch_detail(
        &self,
        source_site: SourceSite,
        url: &str,
        ignore_error_history: bool,
        force_detail_fetch: bool,
    ) -> Result<bool, RetryGateError> {
        if ignore_error_history || force_detail_fetch {
            return Ok(true);
        }
        Ok(!self.is_404_gated(source_site, url).await?)
    }

    /// Records a detail-fetch 404, unless the run ignores error history
    /// entirely.
    pub async fn record_detail_failure(
        &self,
        source_site: SourceSite,
        url: &str,
        ignore_error_history: bool,
    ) -> Result<(), RetryGateError> {
        if ignore_error_history {
            return Ok(());
        }
        self.repo.record_404(source_site, url).await?;
        Ok(())
    }

    pub async fn is_validation_gated(
        &self,
        source_site: SourceSite,
        url: &str,
        error_type: &str,
    ) -> Result<bool, RetryGateError> {
        match self.repo.find_validation(source_site, url, error_type).await? {
            Some(record) => {
                let wait = ChronoDuration::from_std(backoff_duration(record.error_count))
                    .unwrap_or(ChronoDuration::max_value());
                Ok(Utc::now() < record.last_error_at + wait)
            }
            None => Ok(false),
        }
    }

    pub async fn record_validation_failure(
        &self,
        source_site: SourceSite,
        url: &str,
        error_type: &str,
        error_details: Option<serde_json::Value>,
        ignore_error_history: bool,
    ) -> Result<(), RetryGateError> {
        if ignore_error_history {
            return Ok(());
        }
        self.repo
            .record_validation(source_site, url, error_type, error_details)
            .await?;
        Ok(())
    }

    /// Price mismatches use the fixed `SCRAPER_PRICE_MISMATCH_RETRY_DAYS`
    /// window rather than the exponential back-off schedule.
    pub async fn is_price_mismatch_gated(
        &self,
        source_site: SourceSite,
        site_property_id: &str,
    ) -> Result<bool, RetryGateError> {
        match self
            .repo
            .find_price_mismatch(source_site, site_property_id)
            .await?
        {
            Some(record) => Ok(Utc::now() < record.retry_after),
            None => Ok(false),
        }
    }

    pub async fn record_price_mismatch(
        &self,
        source_site: SourceSite,
        site_property_id: &str,
        property_url: &str,
        list_price: i64,
        detail_price: i64,
        ignore_error_history: bool,
    ) -> Result<Option<DateTime<Utc>>, RetryGateError> {
        if ignore_error_history {
            return Ok(None);
        }
        let retry_after = Utc::now() + ChronoDuration::days(self.price_mismatch_retry_days);
        let record = self
            .repo
            .record_price_mismatch(
                source_site,
                site_property_id,
                property_url,
                list_price,
                detail_price,
                retry_after,
            )
            .await?;
        Ok(Some(record.retry_after))
    }

    pub async fn resolve_price_mismatch(&self, id: Uuid) -> Result<(), RetryGateError> {
        self.repo.resolve_price_mismatch(id).await?;
        Ok(())
    }

    /// Clears whatever open price-mismatch record exists for this listing,
    /// if any. Called once a detail fetch's price agrees with the list
    /// price again, so the gate doesn't keep skipping a listing that has
    /// since resolved itself.
    pub async fn clear_price_mismatch(
        &self,
        source_site: SourceSite,
        site_property_id: &str,
    ) -> Result<(), RetryGateError> {
        if let Some(record) = self.repo.find_price_mismatch(source_site, site_property_id).await? {
            self.repo.resolve_price_mismatch(record.id).await?;
        }
        Ok(())
    }
}

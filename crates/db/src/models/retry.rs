//! Retry-gate record models (§4.3).
//!
//! Three of the four record kinds named in the component design are
//! persisted (404, validation, price mismatch); the fourth, the field
//! error cache, is purely in-memory per run and lives in the
//! `retry-gate` crate instead, not here.

use chrono::{DateTime, Utc};
use common::SourceSite;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A 404 seen on a detail fetch, keyed by `(source_site, url)`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Url404Retry {
    pub id: Uuid,
    pub source_site: SourceSite,
    pub url: String,
    pub error_count: i32,
    pub last_error_at: DateTime<Utc>,
}

/// A required-field validation miss, keyed by `(source_site, url,
/// error_type)`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ValidationErrorRetry {
    pub id: Uuid,
    pub source_site: SourceSite,
    pub url: String,
    pub error_type: String,
    pub error_details: Option<serde_json::Value>,
    pub error_count: i32,
    pub last_error_at: DateTime<Utc>,
}

/// A list-price/detail-price disagreement, keyed by `(source_site,
/// site_property_id)`. Unlike the other two kinds this uses a fixed
/// retry window (`SCRAPER_PRICE_MISMATCH_RETRY_DAYS`) rather than the
/// exponential back-off schedule.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PriceMismatchRetry {
    pub id: Uuid,
    pub source_site: SourceSite,
    pub site_property_id: String,
    pub property_url: String,
    pub list_price: i64,
    pub detail_price: i64,
    pub attempted_at: DateTime<Utc>,
    pub retry_after: DateTime<Utc>,
    pub is_resolved: bool,
}

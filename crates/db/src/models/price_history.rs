//! ListingPriceHistory model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only price observation. One row per observed price change plus
/// one initial row on first insert (§3, §8 Testable Property 3).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ListingPriceHistory {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub price: i64,
    pub recorded_at: DateTime<Utc>,
}

//! ListingPriceHistory repository.

use crate::models::price_history::ListingPriceHistory;
use crate::DbPool;
use sqlx::Error as SqlxError;
use uuid::Uuid;

#[derive(Clone)]
pub struct PriceHistoryRepository {
    pool: DbPool,
}

impl PriceHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append-only insert (§8 Testable Property 3: rows are recorded in
    /// non-decreasing `recorded_at`, which holds naturally here since
    /// `recorded_at` is always `NOW()` and callers insert in real time
    /// order within one listing).
    pub async fn append(
        &self,
        listing_id: Uuid,
        price: i64,
    ) -> Result<ListingPriceHistory, SqlxError> {
        sqlx::query_as::<_, ListingPriceHistory>(
            r#"
            INSERT INTO listing_price_history (listing_id, price, recorded_at)
            VALUES ($1, $2, NOW())
            RETURNING *
            "#,
        )
        .bind(listing_id)
        .bind(price)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_for_listing(
        &self,
        listing_id: Uuid,
    ) -> Result<Vec<ListingPriceHistory>, SqlxError> {
        sqlx::query_as::<_, ListingPriceHistory>(
            "SELECT * FROM listing_price_history WHERE listing_id = $1 ORDER BY recorded_at ASC",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await
    }
}

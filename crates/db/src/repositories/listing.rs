//! PropertyListing repository.

use crate::models::listing::{CreateListing, ListingAttributes, PropertyListing};
use crate::DbPool;
use common::SourceSite;
use sqlx::Error as SqlxError;
use uuid::Uuid;

#[derive(Clone)]
pub struct ListingRepository {
    pool: DbPool,
}

impl ListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_site_property_id(
        &self,
        source_site: SourceSite,
        site_property_id: &str,
    ) -> Result<Option<PropertyListing>, SqlxError> {
        sqlx::query_as::<_, PropertyListing>(
            "SELECT * FROM property_listings WHERE source_site = $1 AND site_property_id = $2",
        )
        .bind(source_site)
        .bind(site_property_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fallback lookup for legacy rows with no `site_property_id` on
    /// record (§4.6 listing upsert).
    pub async fn find_by_url(
        &self,
        source_site: SourceSite,
        url: &str,
    ) -> Result<Option<PropertyListing>, SqlxError> {
        sqlx::query_as::<_, PropertyListing>(
            "SELECT * FROM property_listings WHERE source_site = $1 AND url = $2",
        )
        .bind(source_site)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_active_by_master_property(
        &self,
        master_property_id: Uuid,
    ) -> Result<Vec<PropertyListing>, SqlxError> {
        sqlx::query_as::<_, PropertyListing>(
            "SELECT * FROM property_listings WHERE master_property_id = $1 AND is_active = true",
        )
        .bind(master_property_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create(&self, data: CreateListing) -> Result<PropertyListing, SqlxError> {
        let a = &data.attributes;
        sqlx::query_as::<_, PropertyListing>(
            r#"
            INSERT INTO property_listings (
                master_property_id, source_site, site_property_id, url, room_number,
                current_price, management_fee, repair_fund, listing_floor, listing_area,
                listing_layout, listing_direction, listing_total_floors, listing_balcony_area,
                listing_address, listing_building_name, listing_station_info, agency_name,
                agency_tel, title, remarks, is_active, first_seen_at, first_published_at,
                last_confirmed_at, detail_fetched_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18,
                $19, $20, $21, true, NOW(), NOW(), NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(data.master_property_id)
        .bind(data.source_site)
        .bind(&data.site_property_id)
        .bind(&data.url)
        .bind(&a.room_number)
        .bind(a.current_price)
        .bind(a.management_fee)
        .bind(a.repair_fund)
        .bind(a.listing_floor)
        .bind(a.listing_area)
        .bind(&a.listing_layout)
        .bind(&a.listing_direction)
        .bind(a.listing_total_floors)
        .bind(a.listing_balcony_area)
        .bind(&a.listing_address)
        .bind(&a.listing_building_name)
        .bind(&a.listing_station_info)
        .bind(&a.agency_name)
        .bind(&a.agency_tel)
        .bind(&a.title)
        .bind(&a.remarks)
        .fetch_one(&self.pool)
        .await
    }

    /// Full attribute overwrite plus `last_confirmed_at`/`detail_fetched_at`
    /// bump, used once the caller has already classified the update type
    /// (§4.6 listing upsert).
    pub async fn update_attributes(
        &self,
        id: Uuid,
        attrs: &ListingAttributes,
    ) -> Result<Option<PropertyListing>, SqlxError> {
        sqlx::query_as::<_, PropertyListing>(
            r#"
            UPDATE property_listings
            SET room_number = COALESCE($2, room_number),
                current_price = $3, management_fee = $4, repair_fund = $5, listing_floor = $6,
                listing_area = $7, listing_layout = $8, listing_direction = $9,
                listing_total_floors = $10, listing_balcony_area = $11, listing_address = $12,
                listing_building_name = $13, listing_station_info = $14, agency_name = $15,
                agency_tel = $16, title = $17, remarks = $18,
                last_confirmed_at = NOW(), detail_fetched_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&attrs.room_number)
        .bind(attrs.current_price)
        .bind(attrs.management_fee)
        .bind(attrs.repair_fund)
        .bind(attrs.listing_floor)
        .bind(attrs.listing_area)
        .bind(&attrs.listing_layout)
        .bind(&attrs.listing_direction)
        .bind(attrs.listing_total_floors)
        .bind(attrs.listing_balcony_area)
        .bind(&attrs.listing_address)
        .bind(&attrs.listing_building_name)
        .bind(&attrs.listing_station_info)
        .bind(&attrs.agency_name)
        .bind(&attrs.agency_tel)
        .bind(&attrs.title)
        .bind(&attrs.remarks)
        .fetch_optional(&self.pool)
        .await
    }

    /// Touch `last_confirmed_at` only, for the "skip — update
    /// last_confirmed_at only" branch of Phase B decision 5.
    pub async fn touch_confirmed(&self, id: Uuid) -> Result<(), SqlxError> {
        sqlx::query("UPDATE property_listings SET last_confirmed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Silent URL update when `site_property_id` is stable (§4.6 listing
    /// upsert) — never counted as a real attribute change.
    pub async fn update_url(&self, id: Uuid, url: &str) -> Result<(), SqlxError> {
        sqlx::query("UPDATE property_listings SET url = $2 WHERE id = $1")
            .bind(id)
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Active listings for a site, used by the delisting pass (§4.5, §8
    /// S4) to find rows that went unseen in the current run's Phase A.
    pub async fn list_active_by_source_site(
        &self,
        source_site: SourceSite,
    ) -> Result<Vec<PropertyListing>, SqlxError> {
        sqlx::query_as::<_, PropertyListing>(
            "SELECT * FROM property_listings WHERE source_site = $1 AND is_active = true",
        )
        .bind(source_site)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn delist(&self, id: Uuid) -> Result<(), SqlxError> {
        sqlx::query(
            "UPDATE property_listings SET is_active = false, delisted_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

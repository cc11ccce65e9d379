//! PropertyListing model.

use chrono::{DateTime, Utc};
use common::SourceSite;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One advertisement of a unit on one source site, identified by
/// `(source_site, site_property_id)`. `url` is mutable (§3): it is
/// silently updated when the site keeps the same `site_property_id`
/// but moves the listing to a new URL.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PropertyListing {
    pub id: Uuid,
    pub master_property_id: Uuid,
    pub source_site: SourceSite,
    pub site_property_id: String,
    pub url: String,
    pub room_number: Option<String>,
    pub current_price: i64,
    pub management_fee: Option<i64>,
    pub repair_fund: Option<i64>,
    pub listing_floor: Option<i32>,
    pub listing_area: Option<f64>,
    pub listing_layout: Option<String>,
    pub listing_direction: Option<String>,
    pub listing_total_floors: Option<i32>,
    pub listing_balcony_area: Option<f64>,
    pub listing_address: Option<String>,
    pub listing_building_name: Option<String>,
    pub listing_station_info: Option<String>,
    pub agency_name: Option<String>,
    pub agency_tel: Option<String>,
    pub title: Option<String>,
    pub remarks: Option<String>,
    pub is_active: bool,
    pub first_seen_at: DateTime<Utc>,
    pub first_published_at: Option<DateTime<Utc>>,
    pub last_confirmed_at: DateTime<Utc>,
    pub detail_fetched_at: Option<DateTime<Utc>>,
    pub delisted_at: Option<DateTime<Utc>>,
}

/// Fields carried by a successfully cross-checked detail record, ready to
/// be handed to the resolver for an upsert (§4.5 "hand the merged record
/// to the resolver").
#[derive(Debug, Clone)]
pub struct ListingAttributes {
    /// Trailing room number parsed off the building name by the resolver
    /// (§4.6); never persisted on `MasterProperty`, carried here instead.
    pub room_number: Option<String>,
    pub current_price: i64,
    pub management_fee: Option<i64>,
    pub repair_fund: Option<i64>,
    pub listing_floor: Option<i32>,
    pub listing_area: Option<f64>,
    pub listing_layout: Option<String>,
    pub listing_direction: Option<String>,
    pub listing_total_floors: Option<i32>,
    pub listing_balcony_area: Option<f64>,
    pub listing_address: Option<String>,
    pub listing_building_name: Option<String>,
    pub listing_station_info: Option<String>,
    pub agency_name: Option<String>,
    pub agency_tel: Option<String>,
    pub title: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateListing {
    pub master_property_id: Uuid,
    pub source_site: SourceSite,
    pub site_property_id: String,
    pub url: String,
    pub attributes: ListingAttributes,
}

/// One field-level difference detected during a listing upsert, reported
/// as part of an `other_updates` classification (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

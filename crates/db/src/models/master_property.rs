//! MasterProperty (unit) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The physical unit a listing advertises. Identified within a building
/// by `property_hash` (§4.2); room number is deliberately excluded from
/// the hash and is not stored here at all, only on individual listings.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MasterProperty {
    pub id: Uuid,
    pub building_id: Uuid,
    pub floor: Option<i32>,
    pub area: Option<f64>,
    pub layout: Option<String>,
    pub direction: Option<String>,
    pub balcony_area: Option<f64>,
    pub property_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateMasterProperty {
    pub building_id: Uuid,
    pub floor: Option<i32>,
    pub area: Option<f64>,
    pub layout: Option<String>,
    pub direction: Option<String>,
    pub balcony_area: Option<f64>,
    pub property_hash: String,
}

/// Opportunistic attribute fill for an existing unit (§4.6, property
/// resolution step 2): only ever fills a currently-`None` field, never
/// overwrites a present one.
#[derive(Debug, Clone, Default)]
pub struct UpdateMasterProperty {
    pub floor: Option<i32>,
    pub area: Option<f64>,
    pub layout: Option<String>,
    pub direction: Option<String>,
    pub balcony_area: Option<f64>,
}

impl UpdateMasterProperty {
    pub fn is_empty(&self) -> bool {
        self.floor.is_none()
            && self.area.is_none()
            && self.layout.is_none()
            && self.direction.is_none()
            && self.balcony_area.is_none()
    }
}

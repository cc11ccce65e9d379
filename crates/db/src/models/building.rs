//! Building model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A building entity. `canonical_name` is the folded search key produced
/// by the name canonicalizer; `normalized_name` is the display form and
/// may be decorative (it is never folded).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Building {
    pub id: Uuid,
    pub normalized_name: String,
    pub canonical_name: String,
    pub address: Option<String>,
    pub built_year: Option<i32>,
    pub built_month: Option<i32>,
    pub total_floors: Option<i32>,
    pub basement_floors: Option<i32>,
    pub total_units: Option<i32>,
    pub structure: Option<String>,
    /// False when the display name is raw advertising copy rather than a
    /// real building name (§4.6, step 3 of building resolution).
    pub is_valid_name: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new building.
#[derive(Debug, Clone)]
pub struct CreateBuilding {
    pub normalized_name: String,
    pub canonical_name: String,
    pub address: Option<String>,
    pub built_year: Option<i32>,
    pub built_month: Option<i32>,
    pub total_floors: Option<i32>,
    pub basement_floors: Option<i32>,
    pub total_units: Option<i32>,
    pub structure: Option<String>,
    pub is_valid_name: bool,
}

/// Sparse attribute patch applied opportunistically when richer data
/// becomes available for an existing building (§4.6, step 1 and the
/// majority-vote reconciler of §4.6).
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilding {
    pub normalized_name: Option<String>,
    pub canonical_name: Option<String>,
    pub address: Option<String>,
    pub built_year: Option<i32>,
    pub built_month: Option<i32>,
    pub total_floors: Option<i32>,
    pub basement_floors: Option<i32>,
    pub total_units: Option<i32>,
    pub structure: Option<String>,
    pub is_valid_name: Option<bool>,
}

impl UpdateBuilding {
    pub fn is_empty(&self) -> bool {
        self.normalized_name.is_none()
            && self.canonical_name.is_none()
            && self.address.is_none()
            && self.built_year.is_none()
            && self.built_month.is_none()
            && self.total_floors.is_none()
            && self.basement_floors.is_none()
            && self.total_units.is_none()
            && self.structure.is_none()
            && self.is_valid_name.is_none()
    }
}

//! BuildingExternalId model.

use chrono::{DateTime, Utc};
use common::SourceSite;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maps a site's own building identifier to our internal `Building`.
///
/// Unique per `(source_site, external_id)`. Never silently rewritten —
/// see `Testable Property 4` (no silent rewrites of external ids): a
/// remap requires an explicit delete of the orphaned row first.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BuildingExternalId {
    pub id: Uuid,
    pub source_site: SourceSite,
    pub external_id: String,
    pub building_id: Uuid,
    pub created_at: DateTime<Utc>,
}

//! BuildingExternalId repository.

use crate::models::external_id::BuildingExternalId;
use crate::DbPool;
use common::SourceSite;
use sqlx::Error as SqlxError;
use uuid::Uuid;

#[derive(Clone)]
pub struct ExternalIdRepository {
    pool: DbPool,
}

impl ExternalIdRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        source_site: SourceSite,
        external_id: &str,
    ) -> Result<Option<BuildingExternalId>, SqlxError> {
        sqlx::query_as::<_, BuildingExternalId>(
            "SELECT * FROM building_external_ids WHERE source_site = $1 AND external_id = $2",
        )
        .bind(source_site)
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert-only by design (§8 Testable Property 4: no silent rewrites
    /// of external ids). Callers must delete an orphaned row explicitly
    /// before calling this again for the same `(source_site, external_id)`.
    pub async fn create(
        &self,
        source_site: SourceSite,
        external_id: &str,
        building_id: Uuid,
    ) -> Result<BuildingExternalId, SqlxError> {
        sqlx::query_as::<_, BuildingExternalId>(
            r#"
            INSERT INTO building_external_ids (source_site, external_id, building_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(source_site)
        .bind(external_id)
        .bind(building_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SqlxError> {
        sqlx::query("DELETE FROM building_external_ids WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Whether `building_id` still exists; used to detect an orphaned
    /// mapping before falling through to normal building resolution
    /// (§4.6 step 1).
    pub async fn building_exists(&self, building_id: Uuid) -> Result<bool, SqlxError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM buildings WHERE id = $1")
            .bind(building_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

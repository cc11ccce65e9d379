//! Building repository.

use crate::models::building::{Building, CreateBuilding, UpdateBuilding};
use crate::DbPool;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Repository for building persistence operations.
#[derive(Clone)]
pub struct BuildingRepository {
    pool: DbPool,
}

impl BuildingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: CreateBuilding) -> Result<Building, SqlxError> {
        sqlx::query_as::<_, Building>(
            r#"
            INSERT INTO buildings (
                normalized_name, canonical_name, address, built_year, built_month,
                total_floors, basement_floors, total_units, structure, is_valid_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&data.normalized_name)
        .bind(&data.canonical_name)
        .bind(&data.address)
        .bind(data.built_year)
        .bind(data.built_month)
        .bind(data.total_floors)
        .bind(data.basement_floors)
        .bind(data.total_units)
        .bind(&data.structure)
        .bind(data.is_valid_name)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Building>, SqlxError> {
        sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Look up by the folded canonical search key (§4.6 step 4).
    pub async fn find_by_canonical_name(
        &self,
        canonical_name: &str,
    ) -> Result<Vec<Building>, SqlxError> {
        sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE canonical_name = $1")
            .bind(canonical_name)
            .fetch_all(&self.pool)
            .await
    }

    /// Exact address match, used both for the ad-copy fallback path
    /// (§4.6 step 3) and the canonical-name/address tiebreak (step 4).
    pub async fn find_by_address(&self, address: &str) -> Result<Option<Building>, SqlxError> {
        sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE address = $1 LIMIT 1")
            .bind(address)
            .fetch_optional(&self.pool)
            .await
    }

    /// Opportunistic attribute fill: only ever sets columns the caller
    /// explicitly supplied, matching this codebase's dynamic-`SET`
    /// convention for partial updates.
    pub async fn update(
        &self,
        id: Uuid,
        data: UpdateBuilding,
    ) -> Result<Option<Building>, SqlxError> {
        if data.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut updates = vec!["updated_at = NOW()".to_string()];
        let mut param_idx = 1;

        if data.normalized_name.is_some() {
            param_idx += 1;
            updates.push(format!("normalized_name = ${param_idx}"));
        }
        if data.canonical_name.is_some() {
            param_idx += 1;
            updates.push(format!("canonical_name = ${param_idx}"));
        }
        if data.address.is_some() {
            param_idx += 1;
            updates.push(format!("address = ${param_idx}"));
        }
        if data.built_year.is_some() {
            param_idx += 1;
            updates.push(format!("built_year = ${param_idx}"));
        }
        if data.built_month.is_some() {
            param_idx += 1;
            updates.push(format!("built_month = ${param_idx}"));
        }
        if data.total_floors.is_some() {
            param_idx += 1;
            updates.push(format!("total_floors = ${param_idx}"));
        }
        if data.basement_floors.is_some() {
            param_idx += 1;
            updates.push(format!("basement_floors = ${param_idx}"));
        }
        if data.total_units.is_some() {
            param_idx += 1;
            updates.push(format!("total_units = ${param_idx}"));
        }
        if data.structure.is_some() {
            param_idx += 1;
            updates.push(format!("structure = ${param_idx}"));
        }
        if data.is_valid_name.is_some() {
            param_idx += 1;
            updates.push(format!("is_valid_name = ${param_idx}"));
        }

        let query = format!(
            "UPDATE buildings SET {} WHERE id = $1 RETURNING *",
            updates.join(", ")
        );
        let mut q = sqlx::query_as::<_, Building>(&query).bind(id);

        if let Some(v) = &data.normalized_name {
            q = q.bind(v);
        }
        if let Some(v) = &data.canonical_name {
            q = q.bind(v);
        }
        if let Some(v) = &data.address {
            q = q.bind(v);
        }
        if let Some(v) = data.built_year {
            q = q.bind(v);
        }
        if let Some(v) = data.built_month {
            q = q.bind(v);
        }
        if let Some(v) = data.total_floors {
            q = q.bind(v);
        }
        if let Some(v) = data.basement_floors {
            q = q.bind(v);
        }
        if let Some(v) = data.total_units {
            q = q.bind(v);
        }
        if let Some(v) = &data.structure {
            q = q.bind(v);
        }
        if let Some(v) = data.is_valid_name {
            q = q.bind(v);
        }

        q.fetch_optional(&self.pool).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SqlxError> {
        sqlx::query("DELETE FROM buildings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

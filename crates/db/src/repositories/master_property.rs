//! MasterProperty repository.

use crate::models::master_property::{CreateMasterProperty, MasterProperty, UpdateMasterProperty};
use crate::DbPool;
use sqlx::Error as SqlxError;
use uuid::Uuid;

#[derive(Clone)]
pub struct MasterPropertyRepository {
    pool: DbPool,
}

impl MasterPropertyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_hash(
        &self,
        property_hash: &str,
    ) -> Result<Option<MasterProperty>, SqlxError> {
        sqlx::query_as::<_, MasterProperty>(
            "SELECT * FROM master_properties WHERE property_hash = $1",
        )
        .bind(property_hash)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MasterProperty>, SqlxError> {
        sqlx::query_as::<_, MasterProperty>("SELECT * FROM master_properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_by_building(&self, building_id: Uuid) -> Result<Vec<MasterProperty>, SqlxError> {
        sqlx::query_as::<_, MasterProperty>(
            "SELECT * FROM master_properties WHERE building_id = $1",
        )
        .bind(building_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create(&self, data: CreateMasterProperty) -> Result<MasterProperty, SqlxError> {
        sqlx::query_as::<_, MasterProperty>(
            r#"
            INSERT INTO master_properties (
                building_id, floor, area, layout, direction, balcony_area, property_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(data.building_id)
        .bind(data.floor)
        .bind(data.area)
        .bind(&data.layout)
        .bind(&data.direction)
        .bind(data.balcony_area)
        .bind(&data.property_hash)
        .fetch_one(&self.pool)
        .await
    }

    /// Fill only the columns currently `NULL`, per §4.6 property
    /// resolution step 2 ("fill missing attributes opportunistically").
    pub async fn fill_missing(
        &self,
        id: Uuid,
        data: UpdateMasterProperty,
    ) -> Result<Option<MasterProperty>, SqlxError> {
        if data.is_empty() {
            return self.find_by_id(id).await;
        }

        sqlx::query_as::<_, MasterProperty>(
            r#"
            UPDATE master_properties
            SET floor = COALESCE(floor, $2),
                area = COALESCE(area, $3),
                layout = COALESCE(layout, $4),
                direction = COALESCE(direction, $5),
                balcony_area = COALESCE(balcony_area, $6),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.floor)
        .bind(data.area)
        .bind(&data.layout)
        .bind(&data.direction)
        .bind(data.balcony_area)
        .fetch_optional(&self.pool)
        .await
    }

    /// Overwrite with authoritative values from the majority-vote
    /// reconciler (§4.6).
    pub async fn set_attributes(
        &self,
        id: Uuid,
        floor: Option<i32>,
        area: Option<f64>,
        layout: Option<String>,
        direction: Option<String>,
        balcony_area: Option<f64>,
    ) -> Result<Option<MasterProperty>, SqlxError> {
        sqlx::query_as::<_, MasterProperty>(
            r#"
            UPDATE master_properties
            SET floor = $2, area = $3, layout = $4, direction = $5, balcony_area = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(floor)
        .bind(area)
        .bind(layout)
        .bind(direction)
        .bind(balcony_area)
        .fetch_optional(&self.pool)
        .await
    }
}

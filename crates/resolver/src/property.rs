//! Property (unit) resolution (§4.6).

use crate::error::ResolverError;
use crate::hasher::property_hash;
use db::models::master_property::{CreateMasterProperty, MasterProperty, UpdateMasterProperty};
use db::repositories::master_property::MasterPropertyRepository;
use sqlx::Error as SqlxError;
use uuid::Uuid;

fn is_unique_violation(err: &SqlxError) -> bool {
    matches!(err, SqlxError::Database(db) if db.code().as_deref() == Some("23505"))
}

#[derive(Debug, Clone)]
pub struct PropertyResolutionInput {
    pub building_id: Uuid,
    pub floor: Option<i32>,
    pub area: Option<f64>,
    pub layout: Option<String>,
    pub direction: Option<String>,
    pub balcony_area: Option<f64>,
}

#[derive(Clone)]
pub struct PropertyResolver {
    properties: MasterPropertyRepository,
}

impl PropertyResolver {
    pub fn new(properties: MasterPropertyRepository) -> Self {
        Self { properties }
    }

    pub async fn resolve(
        &self,
        input: PropertyResolutionInput,
    ) -> Result<MasterProperty, ResolverError> {
        let hash = property_hash(
            input.building_id,
            input.floor,
            input.area,
            input.layout.as_deref(),
            input.direction.as_deref(),
        );

        if let Some(existing) = self.properties.find_by_hash(&hash).await? {
            return self.fill_missing(existing, &input).await;
        }

        let data = CreateMasterProperty {
            building_id: input.building_id,
            floor: input.floor,
            area: input.area,
            layout: input.layout.clone(),
            direction: input.direction.clone(),
            balcony_area: input.balcony_area,
            property_hash: hash.clone(),
        };

        match self.properties.create(data).await {
            Ok(property) => Ok(property),
            Err(e) if is_unique_violation(&e) => self
                .properties
                .find_by_hash(&hash)
                .await?
                .ok_or_else(|| ResolverError::Database(e)),
            Err(e) => Err(e.into()),
        }
    }

    async fn fill_missing(
        &self,
        existing: MasterProperty,
        input: &PropertyResolutionInput,
    ) -> Result<MasterProperty, ResolverError> {
        let patch = UpdateMasterProperty {
            floor: existing.floor.is_none().then_some(input.floor).flatten(),
            area: existing.area.is_none().then_some(input.area).flatten(),
            layout: existing.layout.is_none().then(|| input.layout.clone()).flatten(),
            direction: existing.direction.is_none().then(|| input.direction.clone()).flatten(),
            balcony_area: existing.balcony_area.is_none().then_some(input.balcony_area).flatten(),
        };
        if patch.is_empty() {
            return Ok(existing);
        }
        let id = existing.id;
        Ok(self.properties.fill_missing(id, patch).await?.unwrap_or(existing))
    }
}

//! Building resolution (§4.6).

use crate::error::ResolverError;
use crate::hasher::{canonicalize_building_name, extract_room_number, looks_like_ad_copy};
use common::SourceSite;
use db::models::building::{Building, CreateBuilding, UpdateBuilding};
use db::repositories::building::BuildingRepository;
use db::repositories::external_id::ExternalIdRepository;
use sqlx::Error as SqlxError;

fn is_unique_violation(err: &SqlxError) -> bool {
    matches!(err, SqlxError::Database(db) if db.code().as_deref() == Some("23505"))
}

#[derive(Debug, Clone)]
pub struct BuildingResolutionInput {
    pub source_site: SourceSite,
    pub external_property_id: Option<String>,
    pub building_name: String,
    pub address: Option<String>,
    pub built_year: Option<i32>,
    pub built_month: Option<i32>,
    pub total_floors: Option<i32>,
    pub basement_floors: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct BuildingResolution {
    pub building: Building,
    /// Trailing room number parsed out of `building_name`; never persisted
    /// on the `Building` row, only returned for the caller to attach to
    /// the listing/unit instead.
    pub room_number: Option<String>,
}

#[derive(Clone)]
pub struct BuildingResolver {
    buildings: BuildingRepository,
    external_ids: ExternalIdRepository,
}

impl BuildingResolver {
    pub fn new(buildings: BuildingRepository, external_ids: ExternalIdRepository) -> Self {
        Self { buildings, external_ids }
    }

    pub async fn resolve(
        &self,
        input: BuildingResolutionInput,
    ) -> Result<BuildingResolution, ResolverError> {
        let (name_without_room, room_number) = extract_room_number(&input.building_name);

        if let Some(ext_id) = &input.external_property_id {
            if let Some(mapping) = self.external_ids.find(input.source_site, ext_id).await? {
                if self.external_ids.building_exists(mapping.building_id).await? {
                    let building = self
                        .buildings
                        .find_by_id(mapping.building_id)
                        .await?
                        .ok_or_else(|| {
                            ResolverError::Ambiguous(
                                "external id mapping points at a vanished building".to_string(),
                            )
                        })?;
                    let building = self.fill_if_richer(building, &input).await?;
                    return Ok(BuildingResolution { building, room_number });
                }
                // Orphaned mapping: the Building it points at is gone.
                // Delete it and fall through to ordinary resolution.
                self.external_ids.delete(mapping.id).await?;
            }
        }

        let building = if looks_like_ad_copy(&name_without_room) {
            self.resolve_ad_copy(&name_without_room, &input).await?
        } else {
            self.resolve_by_canonical_name(&name_without_room, &input).await?
        };

        let building = self.fill_if_richer(building, &input).await?;

        if let Some(ext_id) = &input.external_property_id {
            if let Err(e) = self.external_ids.create(input.source_site, ext_id, building.id).await
            {
                if !is_unique_violation(&e) {
                    return Err(e.into());
                }
                tracing::debug!(
                    external_id = %ext_id,
                    "building_external_ids race lost, mapping already exists"
                );
            }
        }

        Ok(BuildingResolution { building, room_number })
    }

    async fn resolve_ad_copy(
        &self,
        ad_copy_name: &str,
        input: &BuildingResolutionInput,
    ) -> Result<Building, ResolverError> {
        let address = input.address.as_ref().ok_or_else(|| {
            ResolverError::Ambiguous(
                "building name looks like advertising copy and no address was given".to_string(),
            )
        })?;
        if let Some(existing) = self.buildings.find_by_address(address).await? {
            return Ok(existing);
        }
        self.create_with_retry(CreateBuilding {
            normalized_name: ad_copy_name.to_string(),
            canonical_name: canonicalize_building_name(ad_copy_name),
            address: Some(address.clone()),
            built_year: input.built_year,
            built_month: input.built_month,
            total_floors: input.total_floors,
            basement_floors: input.basement_floors,
            total_units: None,
            structure: None,
            is_valid_name: false,
        })
        .await
    }

    async fn resolve_by_canonical_name(
        &self,
        name: &str,
        input: &BuildingResolutionInput,
    ) -> Result<Building, ResolverError> {
        let canonical = canonicalize_building_name(name);
        let candidates = self.buildings.find_by_canonical_name(&canonical).await?;

        let existing = match &input.address {
            Some(address) => candidates
                .iter()
                .find(|b| b.address.as_deref() == Some(address.as_str()))
                .cloned()
                .or_else(|| candidates.into_iter().next()),
            None => candidates.into_iter().next(),
        };

        match existing {
            Some(building) => Ok(building),
            None => {
                self.create_with_retry(CreateBuilding {
                    normalized_name: name.to_string(),
                    canonical_name: canonical,
                    address: input.address.clone(),
                    built_year: input.built_year,
                    built_month: input.built_month,
                    total_floors: input.total_floors,
                    basement_floors: input.basement_floors,
                    total_units: None,
                    structure: None,
                    is_valid_name: true,
                })
                .await
            }
        }
    }

    async fn create_with_retry(&self, data: CreateBuilding) -> Result<Building, ResolverError> {
        let canonical_name = data.canonical_name.clone();
        match self.buildings.create(data).await {
            Ok(building) => Ok(building),
            Err(e) if is_unique_violation(&e) => self
                .buildings
                .find_by_canonical_name(&canonical_name)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| ResolverError::Database(e)),
            Err(e) => Err(e.into()),
        }
    }

    async fn fill_if_richer(
        &self,
        building: Building,
        input: &BuildingResolutionInput,
    ) -> Result<Building, ResolverError> {
        let patch = UpdateBuilding {
            built_year: (building.built_year.is_none()).then_some(input.built_year).flatten(),
            built_month: (building.built_month.is_none()).then_some(input.built_month).flatten(),
            total_floors: (building.total_floors.is_none()).then_some(input.total_floors).flatten(),
            basement_floors: (building.basement_floors.is_none())
                .then_some(input.basement_floors)
                .flatten(),
            ..Default::default()
        };
        if patch.is_empty() {
            return Ok(building);
        }
        let id = building.id;
        Ok(self.buildings.update(id, patch).await?.unwrap_or(building))
    }
}

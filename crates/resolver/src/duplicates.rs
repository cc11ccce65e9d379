//! Fuzzy duplicate-candidate search (supplemented feature, grounded in
//! `original_source/backend/app/utils/fuzzy_property_matcher.py`).
//!
//! This never changes automatic hash-exact resolution (§4.6 property
//! resolution is unaffected); it only surfaces candidates for an operator
//! to review, e.g. via the `scraper-cli` binary.

use crate::error::ResolverError;
use crate::hasher::property_hash_without_direction;
use db::models::master_property::MasterProperty;
use db::repositories::master_property::MasterPropertyRepository;

const AREA_TOLERANCE_SQM: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct DuplicateCandidate {
    pub property: MasterProperty,
    pub reason: String,
}

#[derive(Clone)]
pub struct DuplicateFinder {
    properties: MasterPropertyRepository,
}

impl DuplicateFinder {
    pub fn new(properties: MasterPropertyRepository) -> Self {
        Self { properties }
    }

    pub async fn find_candidate_duplicates(
        &self,
        property: &MasterProperty,
    ) -> Result<Vec<DuplicateCandidate>, ResolverError> {
        let siblings = self.properties.list_by_building(property.building_id).await?;
        let target_hash = property_hash_without_direction(
            property.building_id,
            property.floor,
            property.area,
            property.layout.as_deref(),
        );

        let mut candidates = Vec::new();
        for sibling in siblings {
            if sibling.id == property.id {
                continue;
            }

            let sibling_hash = property_hash_without_direction(
                sibling.building_id,
                sibling.floor,
                sibling.area,
                sibling.layout.as_deref(),
            );
            if sibling_hash == target_hash {
                candidates.push(DuplicateCandidate {
                    reason: "floor, area and layout match; direction differs or is missing"
                        .to_string(),
                    property: sibling,
                });
                continue;
            }

            if let (Some(floor), Some(sibling_floor)) = (property.floor, sibling.floor) {
                if floor == sibling_floor {
                    if let (Some(area), Some(sibling_area)) = (property.area, sibling.area) {
                        if (area - sibling_area).abs() <= AREA_TOLERANCE_SQM {
                            candidates.push(DuplicateCandidate {
                                reason: format!(
                                    "same floor, area within {AREA_TOLERANCE_SQM}㎡ ({area:.2} vs {sibling_area:.2})"
                                ),
                                property: sibling,
                            });
                        }
                    }
                }
            }
        }

        Ok(candidates)
    }
}

//! Majority-vote reconciliation (§4.6).
//!
//! After any listing upsert that touched a `MasterProperty`, its
//! authoritative attributes are recomputed as the mode across its active
//! listings' listing-side fields, ties broken by most recent
//! `last_confirmed_at`. The owning `Building`'s display fields and
//! `canonical_name` are recomputed the same way across all of its units'
//! listings.

use crate::error::ResolverError;
use crate::hasher::{canonicalize_building_name, looks_like_ad_copy};
use chrono::{DateTime, Utc};
use db::models::building::UpdateBuilding;
use db::models::listing::PropertyListing;
use db::repositories::building::BuildingRepository;
use db::repositories::listing::ListingRepository;
use db::repositories::master_property::MasterPropertyRepository;
use uuid::Uuid;

/// Mode across present values, tie-broken by the most recent timestamp
/// among the tied values. `O(n^2)` in the number of listings, which is
/// fine at the scale one building's active listings reach.
fn majority_vote<T: Clone + PartialEq>(items: &[(Option<T>, DateTime<Utc>)]) -> Option<T> {
    let present: Vec<&(Option<T>, DateTime<Utc>)> = items.iter().filter(|(v, _)| v.is_some()).collect();
    let mut best: Option<(T, usize, DateTime<Utc>)> = None;
    for (value, _) in &present {
        let value = value.clone().unwrap();
        let matching = || present.iter().filter(|(v, _)| v.as_ref() == Some(&value));
        let count = matching().count();
        let max_ts = matching().map(|(_, ts)| *ts).max().unwrap();
        let replace = match &best {
            None => true,
            Some((_, best_count, best_ts)) => count > *best_count || (count == *best_count && max_ts > *best_ts),
        };
        if replace {
            best = Some((value, count, max_ts));
        }
    }
    best.map(|(v, _, _)| v)
}

#[derive(Clone)]
pub struct Reconciler {
    properties: MasterPropertyRepository,
    buildings: BuildingRepository,
    listings: ListingRepository,
}

impl Reconciler {
    pub fn new(
        properties: MasterPropertyRepository,
        buildings: BuildingRepository,
        listings: ListingRepository,
    ) -> Self {
        Self { properties, buildings, listings }
    }

    pub async fn reconcile_property(&self, master_property_id: Uuid) -> Result<(), ResolverError> {
        let active = self.listings.list_active_by_master_property(master_property_id).await?;
        if active.is_empty() {
            return Ok(());
        }

        let floor = majority_vote(&ts_pairs(&active, |l| l.listing_floor));
        let area = majority_vote(&ts_pairs(&active, |l| l.listing_area));
        let layout = majority_vote(&ts_pairs(&active, |l| l.listing_layout.clone()));
        let direction = majority_vote(&ts_pairs(&active, |l| l.listing_direction.clone()));
        let balcony_area = majority_vote(&ts_pairs(&active, |l| l.listing_balcony_area));

        self.properties
            .set_attributes(master_property_id, floor, area, layout, direction, balcony_area)
            .await?;
        Ok(())
    }

    pub async fn reconcile_building(&self, building_id: Uuid) -> Result<(), ResolverError> {
        let units = self.properties.list_by_building(building_id).await?;
        let mut active = Vec::new();
        for unit in &units {
            active.extend(self.listings.list_active_by_master_property(unit.id).await?);
        }
        if active.is_empty() {
            return Ok(());
        }

        let display_name = majority_vote(&ts_pairs(&active, |l| l.listing_building_name.clone()));
        let address = majority_vote(&ts_pairs(&active, |l| l.listing_address.clone()));

        let Some(name) = display_name else {
            return Ok(());
        };

        self.buildings
            .update(
                building_id,
                UpdateBuilding {
                    canonical_name: Some(canonicalize_building_name(&name)),
                    is_valid_name: Some(!looks_like_ad_copy(&name)),
                    normalized_name: Some(name),
                    address,
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }
}

fn ts_pairs<T: Clone>(
    listings: &[PropertyListing],
    extract: impl Fn(&PropertyListing) -> Option<T>,
) -> Vec<(Option<T>, DateTime<Utc>)> {
    listings.iter().map(|l| (extract(l), l.last_confirmed_at)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    #[test]
    fn majority_vote_picks_the_most_common_value() {
        let items = vec![
            (Some(60.0), ts(1)),
            (Some(60.0), ts(2)),
            (Some(61.0), ts(3)),
        ];
        assert_eq!(majority_vote(&items), Some(60.0));
    }

    #[test]
    fn majority_vote_breaks_ties_by_most_recent_timestamp() {
        let items = vec![
            (Some("2LDK".to_string()), ts(1)),
            (Some("3LDK".to_string()), ts(5)),
        ];
        assert_eq!(majority_vote(&items), Some("3LDK".to_string()));
    }

    #[test]
    fn majority_vote_ignores_absent_values() {
        let items: Vec<(Option<i32>, DateTime<Utc>)> = vec![(None, ts(1)), (Some(5), ts(2))];
        assert_eq!(majority_vote(&items), Some(5));
    }

    #[test]
    fn majority_vote_is_idempotent_across_repeated_runs() {
        let items = vec![
            (Some(5), ts(1)),
            (Some(5), ts(2)),
            (Some(6), ts(3)),
        ];
        let first = majority_vote(&items);
        let second = majority_vote(&items);
        assert_eq!(first, second);
    }
}

//! Listing upsert and update classification (§4.6).

use crate::error::ResolverError;
use common::{SourceSite, UpdateType};
use db::models::listing::{CreateListing, FieldChange, ListingAttributes, PropertyListing};
use db::repositories::listing::ListingRepository;
use db::repositories::price_history::PriceHistoryRepository;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ListingUpsertInput {
    pub source_site: SourceSite,
    pub master_property_id: Uuid,
    pub site_property_id: String,
    pub url: String,
    pub attributes: ListingAttributes,
}

#[derive(Clone)]
pub struct ListingResolver {
    listings: ListingRepository,
    price_history: PriceHistoryRepository,
}

fn changed<T: PartialEq + ToString>(
    field: &str,
    old: &Option<T>,
    new: &Option<T>,
    changes: &mut Vec<FieldChange>,
) {
    if old != new {
        changes.push(FieldChange {
            field: field.to_string(),
            old_value: old.as_ref().map(ToString::to_string),
            new_value: new.as_ref().map(ToString::to_string),
        });
    }
}

fn diff_fields(existing: &PropertyListing, attrs: &ListingAttributes) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    changed("listing_building_name", &existing.listing_building_name, &attrs.listing_building_name, &mut changes);
    changed("management_fee", &existing.management_fee, &attrs.management_fee, &mut changes);
    changed("repair_fund", &existing.repair_fund, &attrs.repair_fund, &mut changes);
    changed("listing_floor", &existing.listing_floor, &attrs.listing_floor, &mut changes);
    changed("listing_area", &existing.listing_area, &attrs.listing_area, &mut changes);
    changed("listing_layout", &existing.listing_layout, &attrs.listing_layout, &mut changes);
    changed("listing_direction", &existing.listing_direction, &attrs.listing_direction, &mut changes);
    changed("listing_total_floors", &existing.listing_total_floors, &attrs.listing_total_floors, &mut changes);
    changed("listing_balcony_area", &existing.listing_balcony_area, &attrs.listing_balcony_area, &mut changes);
    changed("listing_address", &existing.listing_address, &attrs.listing_address, &mut changes);
    changes
}

impl ListingResolver {
    pub fn new(listings: ListingRepository, price_history: PriceHistoryRepository) -> Self {
        Self { listings, price_history }
    }

    pub async fn upsert(
        &self,
        input: ListingUpsertInput,
    ) -> Result<(PropertyListing, UpdateType, Vec<FieldChange>), ResolverError> {
        let existing = match self
            .listings
            .find_by_site_property_id(input.source_site, &input.site_property_id)
            .await?
        {
            Some(listing) => Some(listing),
            None => self.listings.find_by_url(input.source_site, &input.url).await?,
        };

        let Some(existing) = existing else {
            return self.insert_new(input).await;
        };

        if existing.master_property_id != input.master_property_id {
            tracing::info!(
                listing_id = %existing.id,
                "same url/site_property_id now resolves to a different unit, delisting stale row"
            );
            self.listings.delist(existing.id).await?;
            return self.insert_new(input).await;
        }

        if existing.url != input.url {
            self.listings.update_url(existing.id, &input.url).await?;
        }

        let price_changed = existing.current_price != input.attributes.current_price;
        let field_changes = diff_fields(&existing, &input.attributes);

        let updated = self
            .listings
            .update_attributes(existing.id, &input.attributes)
            .await?
            .unwrap_or(existing);

        if price_changed {
            self.price_history.append(updated.id, updated.current_price).await?;
            Ok((updated, UpdateType::PriceUpdated, field_changes))
        } else if !field_changes.is_empty() {
            Ok((updated, UpdateType::OtherUpdates, field_changes))
        } else {
            Ok((updated, UpdateType::RefetchedUnchanged, Vec::new()))
        }
    }

    async fn insert_new(
        &self,
        input: ListingUpsertInput,
    ) -> Result<(PropertyListing, UpdateType, Vec<FieldChange>), ResolverError> {
        let listing = self
            .listings
            .create(CreateListing {
                master_property_id: input.master_property_id,
                source_site: input.source_site,
                site_property_id: input.site_property_id,
                url: input.url,
                attributes: input.attributes,
            })
            .await?;
        self.price_history.append(listing.id, listing.current_price).await?;
        Ok((listing, UpdateType::New, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_fields_reports_only_changed_columns() {
        let base = PropertyListing {
            id: Uuid::nil(),
            master_property_id: Uuid::nil(),
            source_site: SourceSite::Suumo,
            site_property_id: "A1".to_string(),
            url: "https://suumo.jp/detail/A1".to_string(),
            room_number: None,
            current_price: 5000,
            management_fee: Some(10000),
            repair_fund: None,
            listing_floor: Some(5),
            listing_area: Some(60.0),
            listing_layout: Some("2LDK".to_string()),
            listing_direction: Some("南".to_string()),
            listing_total_floors: Some(10),
            listing_balcony_area: None,
            listing_address: Some("東京都港区麻布1-1-1".to_string()),
            listing_building_name: Some("麻布ハウス".to_string()),
            listing_station_info: None,
            agency_name: None,
            agency_tel: None,
            title: None,
            remarks: None,
            is_active: true,
            first_seen_at: chrono::Utc::now(),
            first_published_at: None,
            last_confirmed_at: chrono::Utc::now(),
            detail_fetched_at: None,
            delisted_at: None,
        };

        let mut attrs = ListingAttributes {
            room_number: None,
            current_price: 4800,
            management_fee: Some(10000),
            repair_fund: None,
            listing_floor: Some(5),
            listing_area: Some(60.0),
            listing_layout: Some("2LDK".to_string()),
            listing_direction: Some("南".to_string()),
            listing_total_floors: Some(10),
            listing_balcony_area: None,
            listing_address: Some("東京都港区麻布1-1-1".to_string()),
            listing_building_name: Some("麻布ハウス".to_string()),
            listing_station_info: None,
            agency_name: None,
            agency_tel: None,
            title: None,
            remarks: None,
        };

        // price itself is not in diff_fields (handled separately); only
        // non-price attribute changes should show up here.
        assert!(diff_fields(&base, &attrs).is_empty());

        attrs.listing_area = Some(61.5);
        let changes = diff_fields(&base, &attrs);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "listing_area");
    }
}

//! Phase B — Process (§4.5, §4.6).

use crate::circuit_breakers::{FieldErrorTracker, SuspiciousUpdateGuard};
use crate::context::Context;
use crate::http::{FetchOutcome, HttpFetcher};
use crate::progress::Phase;
use crate::resume::ResumeState;
use crate::OrchestratorError;
use common::{SourceSite, UpdateType};
use db::models::alert::{AlertType, CreateScraperAlert};
use db::models::listing::ListingAttributes;
use db::repositories::alert::AlertRepository;
use db::repositories::listing::ListingRepository;
use parsers::{ListRow, PortalParser};
use resolver::{
    BuildingResolutionInput, BuildingResolver, ListingResolver, ListingUpsertInput,
    PropertyResolutionInput, PropertyResolver, Reconciler,
};
use retry_gate::RetryGate;
use tokio::time::sleep;
use uuid::Uuid;

/// Everything Phase B needs beyond the run parameters already carried in
/// `Context`/`ResumeState`. Built once per task in `run.rs`.
pub struct ProcessDeps {
    pub listings: ListingRepository,
    pub retry_gate: RetryGate,
    pub buildings: BuildingResolver,
    pub properties: PropertyResolver,
    pub listing_resolver: ListingResolver,
    pub reconciler: Reconciler,
    pub alerts: AlertRepository,
    pub force_detail_fetch: bool,
    pub ignore_error_history: bool,
    pub detail_refetch_days: i64,
}

enum FetchDecision {
    Fetch(&'static str),
    SkipTouch(Uuid),
    SkipGated,
}

/// Pure decision of whether an already-known listing warrants a fresh
/// detail fetch (§4.6 decision table), isolated from its repository lookup
/// so it can be tested without a database.
fn fetch_reason(
    list_price: Option<i64>,
    current_price: i64,
    last_checked: chrono::DateTime<chrono::Utc>,
    detail_refetch_days: i64,
) -> Option<&'static str> {
    if list_price.is_some() && list_price != Some(current_price) {
        return Some("price_changed");
    }
    let stale_days = (chrono::Utc::now() - last_checked).num_days();
    (stale_days >= detail_refetch_days).then_some("stale")
}

async fn decide_fetch(
    deps: &ProcessDeps,
    source_site: SourceSite,
    row: &ListRow,
) -> Result<FetchDecision, OrchestratorError> {
    if deps.force_detail_fetch {
        return Ok(FetchDecision::Fetch("forced"));
    }

    let Some(existing) = deps
        .listings
        .find_by_site_property_id(source_site, &row.site_property_id)
        .await?
    else {
        return Ok(FetchDecision::Fetch("new"));
    };

    let last_checked = existing.detail_fetched_at.unwrap_or(existing.first_seen_at);
    let reason = fetch_reason(row.price, existing.current_price, last_checked, deps.detail_refetch_days);

    let Some(reason) = reason else {
        return Ok(FetchDecision::SkipTouch(existing.id));
    };

    let gated = !deps
        .retry_gate
        .should_fetch_detail(source_site, &row.url, deps.ignore_error_history, deps.force_detail_fetch)
        .await?;
    if gated {
        return Ok(FetchDecision::SkipGated);
    }

    if !deps.force_detail_fetch
        && !deps.ignore_error_history
        && deps
            .retry_gate
            .is_price_mismatch_gated(source_site, &row.site_property_id)
            .await?
    {
        return Ok(FetchDecision::SkipGated);
    }

    Ok(FetchDecision::Fetch(reason))
}

enum ProcessOutcome {
    Updated { update_type: UpdateType, suspicious: bool },
    Skipped,
    PriceMismatch,
    BuildingNameMismatch,
    DetailFetchFailed,
    RequiredFieldMissing { price_missing: bool },
    BuildingAmbiguous,
}

async fn process_one(
    ctx: &Context,
    fetcher: &HttpFetcher,
    parser: &dyn PortalParser,
    source_site: SourceSite,
    deps: &ProcessDeps,
    row: &ListRow,
    field_errors: &mut FieldErrorTracker,
) -> Result<ProcessOutcome, OrchestratorError> {
    ctx.checkpoint().await?;

    let reason = match decide_fetch(deps, source_site, row).await? {
        FetchDecision::SkipGated => return Ok(ProcessOutcome::Skipped),
        FetchDecision::SkipTouch(id) => {
            deps.listings.touch_confirmed(id).await?;
            return Ok(ProcessOutcome::Skipped);
        }
        FetchDecision::Fetch(reason) => reason,
    };
    tracing::debug!(url = %row.url, reason, "fetching detail page");

    ctx.checkpoint().await?;

    let detail_html = match fetcher.fetch(&row.url).await {
        FetchOutcome::Ok(body) => body,
        FetchOutcome::NotFound => {
            deps.retry_gate
                .record_detail_failure(source_site, &row.url, deps.ignore_error_history)
                .await?;
            return Ok(ProcessOutcome::DetailFetchFailed);
        }
        FetchOutcome::Maintenance => {
            return Err(OrchestratorError::Maintenance { source_site: source_site.to_string() });
        }
        FetchOutcome::SoftFailure(reason) => {
            tracing::warn!(url = %row.url, %reason, "soft failure fetching detail page");
            return Ok(ProcessOutcome::DetailFetchFailed);
        }
    };

    let Some(detail) = parser.parse_detail(&detail_html, row) else {
        deps.retry_gate
            .record_validation_failure(source_site, &row.url, "parse_failed", None, deps.ignore_error_history)
            .await?;
        return Ok(ProcessOutcome::DetailFetchFailed);
    };

    field_errors.record("price", detail.price.is_some());
    field_errors.record("building_name", detail.building_name.is_some());
    field_errors.record("area", detail.area.is_some());
    field_errors.record("layout", detail.layout.is_some());
    field_errors.record("floor", detail.floor.is_some());
    field_errors.record("built_year", detail.built_year.is_some());

    let price_missing = row.price.is_none() && detail.price.is_none();

    if !parser.validate_site_property_id(&detail.site_property_id, &row.url) {
        tracing::warn!(url = %row.url, id = %detail.site_property_id, "site_property_id failed shape validation");
        deps.retry_gate
            .record_validation_failure(source_site, &row.url, "invalid_site_property_id", None, deps.ignore_error_history)
            .await?;
        return Ok(ProcessOutcome::RequiredFieldMissing { price_missing });
    }

    let missing_required: Vec<&str> = parser
        .get_required_fields()
        .iter()
        .copied()
        .filter(|field| !detail.has_field(field))
        .collect();
    if !missing_required.is_empty() {
        tracing::warn!(url = %row.url, ?missing_required, "detail record missing required field(s)");
        deps.retry_gate
            .record_validation_failure(
                source_site,
                &row.url,
                "missing_required_field",
                Some(serde_json::json!({ "fields": missing_required })),
                deps.ignore_error_history,
            )
            .await?;
        return Ok(ProcessOutcome::RequiredFieldMissing { price_missing });
    }

    if let (Some(list_price), Some(detail_price)) = (row.price, detail.price) {
        if list_price != detail_price {
            deps.retry_gate
                .record_price_mismatch(
                    source_site,
                    &row.site_property_id,
                    &row.url,
                    list_price,
                    detail_price,
                    deps.ignore_error_history,
                )
                .await?;
            return Ok(ProcessOutcome::PriceMismatch);
        }
    }
    deps.retry_gate.clear_price_mismatch(source_site, &detail.site_property_id).await?;

    if let (Some(list_name), Some(detail_name)) = (&row.building_name_from_list, &detail.building_name) {
        let (matched, _resolved_name) = parser.verify_building_names_match(detail_name, list_name);
        if !matched {
            tracing::warn!(url = %row.url, list_name, detail_name, "building name cross-check failed");
            return Ok(ProcessOutcome::BuildingNameMismatch);
        }
    }

    ctx.checkpoint().await?;

    let building_name = detail
        .building_name
        .clone()
        .or_else(|| row.building_name_from_list.clone())
        .unwrap_or_default();
    let address = detail.address.clone().or_else(|| row.list_page_address.clone());

    let building_resolution = match deps
        .buildings
        .resolve(BuildingResolutionInput {
            source_site,
            external_property_id: Some(detail.site_property_id.clone()),
            building_name,
            address,
            built_year: detail.built_year,
            built_month: None,
            total_floors: detail.total_floors,
            basement_floors: detail.basement_floors,
        })
        .await
    {
        Ok(resolution) => resolution,
        Err(resolver::ResolverError::Ambiguous(reason)) => {
            tracing::warn!(url = %row.url, reason, "building resolution ambiguous, skipping listing");
            return Ok(ProcessOutcome::BuildingAmbiguous);
        }
        Err(resolver::ResolverError::Database(e)) => return Err(e.into()),
    };

    let property = deps
        .properties
        .resolve(PropertyResolutionInput {
            building_id: building_resolution.building.id,
            floor: detail.floor,
            area: detail.area,
            layout: detail.layout.clone(),
            direction: detail.direction.clone(),
            balcony_area: detail.balcony_area,
        })
        .await?;

    let attributes = ListingAttributes {
        room_number: building_resolution.room_number.clone(),
        current_price: detail.price.unwrap_or(row.price.unwrap_or(0)),
        management_fee: detail.management_fee,
        repair_fund: detail.repair_fund,
        listing_floor: detail.floor,
        listing_area: detail.area,
        listing_layout: detail.layout.clone(),
        listing_direction: detail.direction.clone(),
        listing_total_floors: detail.total_floors,
        listing_balcony_area: detail.balcony_area,
        listing_address: detail.address.clone(),
        listing_building_name: detail.building_name.clone(),
        listing_station_info: detail.station_info.clone(),
        agency_name: detail.agency_name.clone(),
        agency_tel: detail.agency_tel.clone(),
        title: detail.title.clone(),
        remarks: detail.remarks.clone(),
    };

    let prior = deps
        .listings
        .find_by_site_property_id(source_site, &detail.site_property_id)
        .await?;
    let suspicious = prior.as_ref().is_some_and(|prior| {
        SuspiciousUpdateGuard::is_suspicious(
            prior.current_price,
            attributes.current_price,
            prior.listing_area,
            attributes.listing_area,
            prior.listing_floor,
            attributes.listing_floor,
        )
    });

    ctx.checkpoint().await?;

    let (listing, update_type, _changes) = deps
        .listing_resolver
        .upsert(ListingUpsertInput {
            source_site,
            master_property_id: property.id,
            site_property_id: detail.site_property_id.clone(),
            url: row.url.clone(),
            attributes,
        })
        .await?;

    deps.reconciler.reconcile_property(listing.master_property_id).await?;
    deps.reconciler.reconcile_building(building_resolution.building.id).await?;

    Ok(ProcessOutcome::Updated { update_type, suspicious })
}

/// Runs Phase B from `state.processed_count` to the end of
/// `state.collected_rows`, updating `state.stats` after every listing.
pub async fn process_all(
    ctx: &Context,
    fetcher: &HttpFetcher,
    parser: &dyn PortalParser,
    source_site: SourceSite,
    deps: &ProcessDeps,
    state: &mut ResumeState,
) -> Result<(), OrchestratorError> {
    let mut field_errors = FieldErrorTracker::default();
    let mut suspicious_guard = SuspiciousUpdateGuard::default();

    state.phase = Phase::Processing;
    state.stats.phase = Some(Phase::Processing);

    while state.processed_count < state.collected_rows.len() {
        ctx.checkpoint().await?;

        let row = state.collected_rows[state.processed_count].clone();
        state.stats.properties_attempted += 1;

        match process_one(ctx, fetcher, parser, source_site, deps, &row, &mut field_errors).await? {
            ProcessOutcome::Updated { update_type, suspicious } => {
                state.stats.properties_processed += 1;
                state.stats.detail_fetched += 1;
                match update_type {
                    UpdateType::New => state.stats.new += 1,
                    UpdateType::PriceUpdated => state.stats.price_updated += 1,
                    UpdateType::OtherUpdates => state.stats.other_updates += 1,
                    UpdateType::RefetchedUnchanged => state.stats.refetched_unchanged += 1,
                    UpdateType::Skipped => state.stats.detail_skipped += 1,
                }
                if suspicious_guard.record(suspicious, ctx.config.suspicious_update_threshold) {
                    deps.alerts
                        .create(CreateScraperAlert {
                            source_site,
                            alert_type: AlertType::SuspiciousUpdateStreak,
                            field_name: None,
                            error_count: ctx.config.suspicious_update_threshold as i32,
                            error_rate: None,
                            message: format!(
                                "{} consecutive suspicious attribute swings",
                                ctx.config.suspicious_update_threshold
                            ),
                        })
                        .await?;
                    return Err(OrchestratorError::CircuitBreakerTripped {
                        reason: "suspicious update streak".to_string(),
                    });
                }
            }
            ProcessOutcome::Skipped => state.stats.detail_skipped += 1,
            ProcessOutcome::PriceMismatch => state.stats.price_mismatch += 1,
            ProcessOutcome::BuildingNameMismatch => {
                state.stats.building_info_missing += 1;
                state.stats.errors += 1;
            }
            ProcessOutcome::DetailFetchFailed => state.stats.errors += 1,
            ProcessOutcome::RequiredFieldMissing { price_missing } => {
                if price_missing {
                    state.stats.price_missing += 1;
                }
                state.stats.errors += 1;
            }
            ProcessOutcome::BuildingAmbiguous => {
                state.stats.building_info_missing += 1;
                state.stats.errors += 1;
            }
        }

        if let Some(field) = field_errors.tripped(
            ctx.config.consecutive_errors,
            ctx.config.critical_error_rate,
            ctx.config.critical_error_count,
        ) {
            let (misses, attempts) = field_errors.counts(&field);
            deps.alerts
                .create(CreateScraperAlert {
                    source_site,
                    alert_type: AlertType::CriticalFieldErrorRate,
                    field_name: Some(field.clone()),
                    error_count: misses as i32,
                    error_rate: Some(misses as f64 / attempts.max(1) as f64),
                    message: format!("critical error rate on field `{field}`"),
                })
                .await?;
            return Err(OrchestratorError::CircuitBreakerTripped {
                reason: format!("critical field error rate on `{field}`"),
            });
        }

        for field in parser.get_partial_required_fields().iter().copied() {
            if field_errors.partial_required_tripped(field, 10, 0.30) {
                let (misses, attempts) = field_errors.counts(field);
                deps.alerts
                    .create(CreateScraperAlert {
                        source_site,
                        alert_type: AlertType::CriticalFieldErrorRate,
                        field_name: Some(field.to_string()),
                        error_count: misses as i32,
                        error_rate: Some(misses as f64 / attempts.max(1) as f64),
                        message: format!("partial-required field `{field}` exceeded its tolerated missing rate"),
                    })
                    .await?;
                return Err(OrchestratorError::CircuitBreakerTripped {
                    reason: format!("partial-required field `{field}` exceeded its tolerated missing rate"),
                });
            }
        }

        state.processed_count += 1;
        (ctx.progress)(&state.stats);
        sleep(ctx.config.politeness_delay).await;
    }

    state.phase = Phase::Completed;
    state.stats.phase = Some(Phase::Completed);
    (ctx.progress)(&state.stats);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fetch_reason_prefers_price_change_over_staleness() {
        let last_checked = chrono::Utc::now();
        assert_eq!(fetch_reason(Some(4800), 5000, last_checked, 30), Some("price_changed"));
    }

    #[test]
    fn fetch_reason_is_none_when_price_matches_and_not_stale() {
        let last_checked = chrono::Utc::now();
        assert_eq!(fetch_reason(Some(5000), 5000, last_checked, 30), None);
    }

    #[test]
    fn fetch_reason_flags_stale_listing_with_unchanged_price() {
        let last_checked = chrono::Utc::now() - Duration::days(31);
        assert_eq!(fetch_reason(Some(5000), 5000, last_checked, 30), Some("stale"));
    }

    #[test]
    fn fetch_reason_ignores_missing_list_price() {
        let last_checked = chrono::Utc::now();
        assert_eq!(fetch_reason(None, 5000, last_checked, 30), None);
    }
}

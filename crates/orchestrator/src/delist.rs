//! Delisting pass (§3 PropertyListing lifecycle, §8 S4, §9 open question
//! "delisting cadence").
//!
//! Run once Phase A has collected a full page set for the task's area.
//! N is fixed at 1: a listing absent from a single completed collection
//! pass is delisted immediately. This mirrors the source's own default
//! and keeps the cadence a pure function of "was it seen this run",
//! with no extra persisted miss-counter.
//!
//! Scope caveat, documented rather than silently assumed: a
//! `PropertyListing` carries no area column, so this pass compares
//! against every currently-active listing for the source site, not just
//! the ones in the scraped area. Running area-scoped tasks against a
//! site whose inventory spans multiple areas will delist listings from
//! areas this task never visited. Callers that scrape one site across
//! several areas in separate tasks must run all of that site's areas
//! before trusting delisted_at, or pass an area covering the whole
//! site's inventory in one task.

use crate::context::Context;
use crate::resume::ResumeState;
use crate::OrchestratorError;
use common::SourceSite;
use db::repositories::listing::ListingRepository;
use std::collections::HashSet;

pub async fn delist_missing(
    ctx: &Context,
    source_site: SourceSite,
    listings: &ListingRepository,
    state: &mut ResumeState,
) -> Result<(), OrchestratorError> {
    let seen: HashSet<&str> =
        state.collected_rows.iter().map(|r| r.site_property_id.as_str()).collect();

    for listing in listings.list_active_by_source_site(source_site).await? {
        if seen.contains(listing.site_property_id.as_str()) {
            continue;
        }
        listings.delist(listing.id).await?;
        state.stats.delisted += 1;
        tracing::info!(
            listing_id = %listing.id,
            site_property_id = listing.site_property_id,
            "delisting, not seen in this run's collection pass"
        );
    }

    ctx.checkpoint().await?;
    (ctx.progress)(&state.stats);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use common::ScraperConfig;
    use parsers::ListRow;

    fn row(site_property_id: &str) -> ListRow {
        ListRow {
            site_property_id: site_property_id.to_string(),
            url: format!("https://example.test/{site_property_id}"),
            price: Some(1000),
            building_name_from_list: None,
            list_page_address: None,
        }
    }

    #[test]
    fn seen_set_keeps_only_current_run_ids() {
        let mut state = ResumeState::fresh();
        state.collected_rows = vec![row("A1"), row("A2")];
        let seen: HashSet<&str> =
            state.collected_rows.iter().map(|r| r.site_property_id.as_str()).collect();
        assert!(seen.contains("A1"));
        assert!(!seen.contains("A3"));
    }

    #[tokio::test]
    async fn checkpoint_runs_without_pause_or_cancel() {
        let ctx = Context::new(tracing::Span::none(), ScraperConfig::default(), Box::new(|_| {}));
        assert!(ctx.checkpoint().await.is_ok());
    }
}

//! Phase A — Collect (§4.5).

use crate::context::Context;
use crate::http::{FetchOutcome, HttpFetcher};
use crate::progress::Phase;
use crate::resume::ResumeState;
use crate::OrchestratorError;
use parsers::{ListRow, PortalParser};
use std::collections::HashSet;
use tokio::time::sleep;

/// Runs Phase A to completion, or until a suspension point escalates to
/// cancel or the site reports maintenance. `state` already carries
/// whatever Phase A collected before a prior pause/restart (§4.5 "Phase
/// re-entry").
pub async fn collect(
    ctx: &Context,
    fetcher: &HttpFetcher,
    parser: &dyn PortalParser,
    area: &str,
    max_pages: u32,
    max_properties: Option<u32>,
    mut state: ResumeState,
) -> Result<ResumeState, OrchestratorError> {
    let mut seen_urls: HashSet<String> =
        state.collected_rows.iter().map(|r| r.url.clone()).collect();
    let mut consecutive_empty_pages = 0u32;
    let mut last_page_urls: Option<Vec<String>> = None;

    loop {
        ctx.checkpoint().await?;

        if let Some(max) = max_properties {
            if state.collected_rows.len() as u32 >= max {
                tracing::info!(max, "max_properties reached, ending collection");
                break;
            }
        }
        if state.current_page > max_pages {
            tracing::warn!(page = state.current_page, max_pages, "max_pages exceeded, ending collection");
            break;
        }

        let url = parser.build_list_url(area, state.current_page);
        let html = match fetcher.fetch(&url).await {
            FetchOutcome::Ok(body) => body,
            FetchOutcome::NotFound => {
                tracing::info!(%url, "list page 404, treating as end of pagination");
                break;
            }
            FetchOutcome::Maintenance => {
                return Err(OrchestratorError::Maintenance {
                    source_site: parser.source_site().to_string(),
                });
            }
            FetchOutcome::SoftFailure(reason) => {
                tracing::warn!(%url, %reason, "soft failure fetching list page");
                consecutive_empty_pages += 1;
                if consecutive_empty_pages >= 2 {
                    break;
                }
                state.current_page += 1;
                sleep(ctx.config.politeness_delay).await;
                continue;
            }
        };

        let (parsed_rows, html_structure_errors) = parser.parse_list(&html);
        let rows: Vec<ListRow> = parsed_rows
            .into_iter()
            .filter(|r| seen_urls.insert(r.url.clone()))
            .collect();
        state.stats.html_structure_errors += html_structure_errors;

        consecutive_empty_pages = if rows.is_empty() { consecutive_empty_pages + 1 } else { 0 };

        let page_urls: Vec<String> = rows.iter().map(|r| r.url.clone()).collect();
        let pagination_stalled = !page_urls.is_empty()
            && last_page_urls.as_ref().is_some_and(|prev| *prev == page_urls);
        last_page_urls = Some(page_urls);

        state.stats.properties_found += rows.len() as u32;
        state.collected_rows.extend(rows);
        (ctx.progress)(&state.stats);

        let is_last = parser.is_last_page(&html);
        state.current_page += 1;

        if is_last || consecutive_empty_pages >= 2 || pagination_stalled {
            break;
        }

        sleep(ctx.config.politeness_delay).await;
    }

    state.phase = Phase::Processing;
    Ok(state)
}

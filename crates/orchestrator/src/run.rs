//! Top-level task runner tying Collect, Process and resume state together
//! (§4.5).

use crate::collect::collect;
use crate::context::Context;
use crate::delist::delist_missing;
use crate::http::HttpFetcher;
use crate::process::{process_all, ProcessDeps};
use crate::progress::Phase;
use crate::resume::ResumeState;
use crate::OrchestratorError;
use common::SourceSite;
use parsers::PortalParser;

/// Parameters for one scrape task (§4.5 "Responsibilities", §6 "Inbound
/// control").
pub struct RunParams {
    pub source_site: SourceSite,
    pub area: String,
    pub max_pages: u32,
    pub max_properties: Option<u32>,
}

/// Runs one task to completion, cancellation, or maintenance abort.
///
/// `resume` re-enters the pipeline per §4.5 "Phase re-entry": a
/// `processing`-phase resume with non-empty `collected_rows` skips Phase A
/// entirely; a `collecting`-phase resume continues Phase A from
/// `current_page` with the already-collected URL set still deduping.
pub async fn run_task(
    ctx: &Context,
    fetcher: &HttpFetcher,
    parser: &dyn PortalParser,
    params: RunParams,
    deps: &ProcessDeps,
    resume: Option<ResumeState>,
) -> Result<ResumeState, OrchestratorError> {
    let state = resume.unwrap_or_else(ResumeState::fresh);

    let mut state = if state.phase == Phase::Processing && !state.collected_rows.is_empty() {
        tracing::info!(task = "resume", page = state.current_page, "resuming in processing phase, skipping collection");
        state
    } else {
        collect(ctx, fetcher, parser, &params.area, params.max_pages, params.max_properties, state).await?
    };

    ctx.checkpoint().await?;

    process_all(ctx, fetcher, parser, params.source_site, deps, &mut state).await?;

    delist_missing(ctx, params.source_site, &deps.listings, &mut state).await?;

    Ok(state)
}

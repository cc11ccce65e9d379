//! Scraper CLI.
//!
//! Manual/operator-driven entry point for the scrape engine (§6 "Inbound
//! control"): runs one task for a site/area, inspects retry-gate and
//! circuit-breaker state, and lists unresolved scraper alerts.
//!
//! ```bash
//! cargo run -p scraper-cli --bin scraper-cli -- run --site suumo --area 13103
//! cargo run -p scraper-cli --bin scraper-cli -- run --site suumo --area 13103 --force-detail-fetch
//! cargo run -p scraper-cli --bin scraper-cli -- alerts
//! cargo run -p scraper-cli --bin scraper-cli -- retry-status --site suumo --url https://suumo.jp/ms/...
//! ```

use clap::{Parser, Subcommand};
use common::{ScraperConfig, SourceSite};
use db::repositories::alert::AlertRepository;
use db::repositories::building::BuildingRepository;
use db::repositories::external_id::ExternalIdRepository;
use db::repositories::listing::ListingRepository;
use db::repositories::master_property::MasterPropertyRepository;
use db::repositories::price_history::PriceHistoryRepository;
use db::repositories::retry::RetryRepository;
use dialoguer::Confirm;
use orchestrator::{run_task, Context, HttpFetcher, ProcessDeps, RunParams};
use resolver::{BuildingResolver, DuplicateFinder, ListingResolver, PropertyResolver, Reconciler};
use retry_gate::RetryGate;

#[derive(Parser)]
#[command(name = "scraper-cli")]
#[command(about = "Operator CLI for the real estate scrape engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scrape task for one site/area to completion.
    Run {
        #[arg(long)]
        site: SourceSite,
        #[arg(long)]
        area: String,
        #[arg(long)]
        max_pages: Option<u32>,
        #[arg(long)]
        max_properties: Option<u32>,
        /// Bypass the fetch-decision gate only; failures are still recorded.
        #[arg(long)]
        force_detail_fetch: bool,
        /// Bypass every retry gate and write no new retry-gate records.
        #[arg(long)]
        ignore_error_history: bool,
    },
    /// Show whether a (site, url) pair is currently gated by the 404 back-off schedule.
    RetryStatus {
        #[arg(long)]
        site: SourceSite,
        #[arg(long)]
        url: String,
    },
    /// List unresolved scraper alerts, optionally resolving one after confirmation.
    Alerts {
        #[arg(long)]
        resolve: Option<uuid::Uuid>,
    },
    /// Surface fuzzy duplicate-candidate units near a given property, for
    /// operator review (§2a "Duplicate-candidate search").
    Duplicates {
        #[arg(long)]
        property_id: uuid::Uuid,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable must be set"))?;
    let pool = db::create_pool(&database_url).await?;

    match cli.command {
        Command::Run { site, area, max_pages, max_properties, force_detail_fetch, ignore_error_history } => {
            run_site(pool, site, area, max_pages, max_properties, force_detail_fetch, ignore_error_history).await
        }
        Command::RetryStatus { site, url } => retry_status(pool, site, url).await,
        Command::Alerts { resolve } => alerts(pool, resolve).await,
        Command::Duplicates { property_id } => duplicates(pool, property_id).await,
    }
}

async fn run_site(
    pool: db::DbPool,
    site: SourceSite,
    area: String,
    max_pages: Option<u32>,
    max_properties: Option<u32>,
    force_detail_fetch: bool,
    ignore_error_history: bool,
) -> anyhow::Result<()> {
    let config = ScraperConfig::from_env();
    let detail_refetch_days = config.detail_refetch_days_for(site);
    let max_pages = max_pages.unwrap_or(config.max_pages);

    let fetcher = HttpFetcher::new(config.http_timeout, Vec::new())?;
    let parser = parsers::parser_for(site);

    let progress = Box::new(|snapshot: &orchestrator::ProgressSnapshot| {
        println!(
            "[{:?}] found={} attempted={} processed={} new={} price_updated={} other_updates={} unchanged={} mismatches={} errors={} html_structure_errors={}",
            snapshot.phase,
            snapshot.properties_found,
            snapshot.properties_attempted,
            snapshot.properties_processed,
            snapshot.new,
            snapshot.price_updated,
            snapshot.other_updates,
            snapshot.refetched_unchanged,
            snapshot.price_mismatch,
            snapshot.errors,
            snapshot.html_structure_errors,
        );
    });

    let ctx = Context::new(tracing::info_span!("scrape_task", %site, %area), config, progress);

    let deps = ProcessDeps {
        listings: ListingRepository::new(pool.clone()),
        retry_gate: RetryGate::new(RetryRepository::new(pool.clone()), ctx.config.price_mismatch_retry_days),
        buildings: BuildingResolver::new(BuildingRepository::new(pool.clone()), ExternalIdRepository::new(pool.clone())),
        properties: PropertyResolver::new(MasterPropertyRepository::new(pool.clone())),
        listing_resolver: ListingResolver::new(
            ListingRepository::new(pool.clone()),
            PriceHistoryRepository::new(pool.clone()),
        ),
        reconciler: Reconciler::new(
            MasterPropertyRepository::new(pool.clone()),
            BuildingRepository::new(pool.clone()),
            ListingRepository::new(pool.clone()),
        ),
        alerts: AlertRepository::new(pool.clone()),
        force_detail_fetch,
        ignore_error_history,
        detail_refetch_days,
    };

    let params = RunParams { source_site: site, area, max_pages, max_properties };

    let final_state = run_task(&ctx, &fetcher, parser.as_ref(), params, &deps, None).await?;

    println!();
    println!("Task complete: {} properties found, {} processed", final_state.stats.properties_found, final_state.stats.properties_processed);
    Ok(())
}

async fn retry_status(pool: db::DbPool, site: SourceSite, url: String) -> anyhow::Result<()> {
    let config = ScraperConfig::from_env();
    let gate = RetryGate::new(RetryRepository::new(pool), config.price_mismatch_retry_days);
    let gated = gate.is_404_gated(site, &url).await?;
    if gated {
        println!("{url} is currently gated by the 404 back-off schedule");
    } else {
        println!("{url} is not gated");
    }
    Ok(())
}

async fn duplicates(pool: db::DbPool, property_id: uuid::Uuid) -> anyhow::Result<()> {
    let properties = MasterPropertyRepository::new(pool);
    let Some(property) = properties.find_by_id(property_id).await? else {
        println!("No such property: {property_id}");
        return Ok(());
    };

    let finder = DuplicateFinder::new(properties);
    let candidates = finder.find_candidate_duplicates(&property).await?;
    if candidates.is_empty() {
        println!("No candidate duplicates found.");
        return Ok(());
    }
    for candidate in candidates {
        println!("{}  {}", candidate.property.id, candidate.reason);
    }
    Ok(())
}

async fn alerts(pool: db::DbPool, resolve: Option<uuid::Uuid>) -> anyhow::Result<()> {
    let repo = AlertRepository::new(pool);

    if let Some(id) = resolve {
        if Confirm::new()
            .with_prompt(format!("Mark alert {id} as resolved?"))
            .default(false)
            .interact()?
        {
            repo.resolve(id).await?;
            println!("Resolved {id}");
        } else {
            println!("Aborted.");
        }
        return Ok(());
    }

    let unresolved = repo.list_unresolved().await?;
    if unresolved.is_empty() {
        println!("No unresolved alerts.");
        return Ok(());
    }
    for alert in unresolved {
        println!(
            "{}  {:?}  site={}  field={:?}  count={}  rate={:?}  {}",
            alert.id, alert.alert_type, alert.source_site, alert.field_name, alert.error_count, alert.error_rate, alert.message
        );
    }
    Ok(())
}

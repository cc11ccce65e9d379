//! Shared domain-neutral types used across every crate in the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five listing websites this engine crawls.
///
/// Matches the site roster of the system this engine was modeled on
/// (`suumo`, `homes`, `nomu`, `rehouse`, `livable`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
#[serde(rename_all = "lowercase")]
pub enum SourceSite {
    Suumo,
    Homes,
    Nomu,
    Rehouse,
    Livable,
}

impl SourceSite {
    pub const ALL: [SourceSite; 5] = [
        SourceSite::Suumo,
        SourceSite::Homes,
        SourceSite::Nomu,
        SourceSite::Rehouse,
        SourceSite::Livable,
    ];

    /// Human-facing display name for logs and operator tooling.
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceSite::Suumo => "SUUMO",
            SourceSite::Homes => "LIFULL HOME'S",
            SourceSite::Nomu => "Nomu.com",
            SourceSite::Rehouse => "Mitsui Rehouse",
            SourceSite::Livable => "Tokyu Livable",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            SourceSite::Suumo => "https://suumo.jp",
            SourceSite::Homes => "https://www.homes.co.jp",
            SourceSite::Nomu => "https://www.nomu.com",
            SourceSite::Rehouse => "https://www.rehouse.co.jp",
            SourceSite::Livable => "https://www.livable.co.jp",
        }
    }

    /// Upper-snake-case token used to build per-site environment variable
    /// names, e.g. `SCRAPER_SUUMO_DETAIL_REFETCH_DAYS`.
    pub fn env_token(&self) -> &'static str {
        match self {
            SourceSite::Suumo => "SUUMO",
            SourceSite::Homes => "HOMES",
            SourceSite::Nomu => "NOMU",
            SourceSite::Rehouse => "REHOUSE",
            SourceSite::Livable => "LIVABLE",
        }
    }
}

impl fmt::Display for SourceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceSite::Suumo => "suumo",
            SourceSite::Homes => "homes",
            SourceSite::Nomu => "nomu",
            SourceSite::Rehouse => "rehouse",
            SourceSite::Livable => "livable",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown source site: {0}")]
pub struct UnknownSourceSite(pub String);

impl FromStr for SourceSite {
    type Err = UnknownSourceSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "suumo" => Ok(SourceSite::Suumo),
            "homes" => Ok(SourceSite::Homes),
            "nomu" => Ok(SourceSite::Nomu),
            "rehouse" => Ok(SourceSite::Rehouse),
            "livable" => Ok(SourceSite::Livable),
            other => Err(UnknownSourceSite(other.to_string())),
        }
    }
}

/// Outcome of a listing upsert, reported to the progress callback and used
/// for per-kind counters in the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    New,
    PriceUpdated,
    OtherUpdates,
    RefetchedUnchanged,
    Skipped,
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateType::New => "new",
            UpdateType::PriceUpdated => "price_updated",
            UpdateType::OtherUpdates => "other_updates",
            UpdateType::RefetchedUnchanged => "refetched_unchanged",
            UpdateType::Skipped => "skipped",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_site_round_trips_through_display_and_from_str() {
        for site in SourceSite::ALL {
            let parsed: SourceSite = site.to_string().parse().unwrap();
            assert_eq!(parsed, site);
        }
    }

    #[test]
    fn unknown_source_site_is_rejected() {
        assert!("zillow".parse::<SourceSite>().is_err());
    }
}

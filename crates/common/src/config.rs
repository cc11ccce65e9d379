//! Centralized environment-variable configuration for a scrape run.
//!
//! Every tunable named in the external-interfaces section is read here
//! once, with a documented default and a `tracing::warn!` when a present
//! value fails to parse (the default is used in that case, the run is
//! never aborted by a malformed env var).

use crate::types::SourceSite;
use std::time::Duration;

fn read_env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, raw, "failed to parse environment variable, using default");
            default
        }),
        Err(_) => default,
    }
}

fn read_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                tracing::warn!(key, raw, "failed to parse boolean environment variable, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// All orchestrator-facing tunables from the external-interfaces contract,
/// resolved once per run and threaded through the task [`Context`] rather
/// than read ad hoc from deep inside the pipeline.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub detail_refetch_days: i64,
    pub smart_scraping: bool,
    pub delay_seconds: f64,
    pub critical_error_rate: f64,
    pub critical_error_count: u32,
    pub consecutive_errors: u32,
    pub suspicious_update_threshold: u32,
    pub prevent_null_updates: bool,
    pub price_mismatch_retry_days: i64,
    pub pause_timeout: Duration,
    pub max_pages: u32,
    pub politeness_delay: Duration,
    pub http_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            detail_refetch_days: 90,
            smart_scraping: true,
            delay_seconds: 1.0,
            critical_error_rate: 0.5,
            critical_error_count: 10,
            consecutive_errors: 5,
            suspicious_update_threshold: 5,
            prevent_null_updates: false,
            price_mismatch_retry_days: 7,
            pause_timeout: Duration::from_secs(300),
            max_pages: 200,
            politeness_delay: Duration::from_secs(2),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl ScraperConfig {
    /// Build a config from the process environment, falling back to the
    /// documented default for every variable that is absent or malformed.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            detail_refetch_days: read_env_parsed(
                "SCRAPER_DETAIL_REFETCH_DAYS",
                defaults.detail_refetch_days,
            ),
            smart_scraping: read_env_bool("SCRAPER_SMART_SCRAPING", defaults.smart_scraping),
            delay_seconds: read_env_parsed("SCRAPER_DELAY", defaults.delay_seconds),
            critical_error_rate: read_env_parsed(
                "SCRAPER_CRITICAL_ERROR_RATE",
                defaults.critical_error_rate,
            ),
            critical_error_count: read_env_parsed(
                "SCRAPER_CRITICAL_ERROR_COUNT",
                defaults.critical_error_count,
            ),
            consecutive_errors: read_env_parsed(
                "SCRAPER_CONSECUTIVE_ERRORS",
                defaults.consecutive_errors,
            ),
            suspicious_update_threshold: read_env_parsed(
                "SCRAPER_SUSPICIOUS_UPDATE_THRESHOLD",
                defaults.suspicious_update_threshold,
            ),
            prevent_null_updates: read_env_bool(
                "SCRAPER_PREVENT_NULL_UPDATES",
                defaults.prevent_null_updates,
            ),
            price_mismatch_retry_days: read_env_parsed(
                "SCRAPER_PRICE_MISMATCH_RETRY_DAYS",
                defaults.price_mismatch_retry_days,
            ),
            ..defaults
        }
    }

    /// Per-site override of `detail_refetch_days` via
    /// `SCRAPER_{SITE}_DETAIL_REFETCH_DAYS`, falling back to the global
    /// value when no per-site override is set.
    pub fn detail_refetch_days_for(&self, site: SourceSite) -> i64 {
        let key = format!("SCRAPER_{}_DETAIL_REFETCH_DAYS", site.env_token());
        read_env_parsed(&key, self.detail_refetch_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ScraperConfig::default();
        assert_eq!(cfg.detail_refetch_days, 90);
        assert!(cfg.smart_scraping);
        assert_eq!(cfg.critical_error_rate, 0.5);
        assert_eq!(cfg.critical_error_count, 10);
        assert_eq!(cfg.consecutive_errors, 5);
        assert_eq!(cfg.suspicious_update_threshold, 5);
        assert!(!cfg.prevent_null_updates);
        assert_eq!(cfg.price_mismatch_retry_days, 7);
        assert_eq!(cfg.max_pages, 200);
    }

    #[test]
    fn per_site_override_falls_back_to_global() {
        let cfg = ScraperConfig::default();
        assert_eq!(cfg.detail_refetch_days_for(SourceSite::Suumo), 90);
    }
}

//! Shared error types used at crate boundaries across the workspace.
//!
//! Each subsystem crate (`normalizer`, `retry_gate`, `resolver`, `orchestrator`, `db`)
//! defines its own `thiserror` enum for its own failure modes and converts into
//! [`ScraperError`] at its public boundary via `#[from]`, so callers one level up
//! (the orchestrator, the CLI) only ever match on one error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type surfaced by a scrape task.
///
/// Per the error-handling design, only run-level conditions ever become a
/// `ScraperError` — per-listing failures are recorded as counters and log
/// events, never propagated as `Err`.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("site returned a maintenance page or 503 for {source_site}")]
    Maintenance { source_site: String },

    #[error("circuit breaker tripped: {reason}")]
    CircuitBreakerTripped { reason: String },

    #[error("task was cancelled")]
    Cancelled,

    #[error("pause exceeded timeout and was escalated to cancel")]
    PauseTimeout,

    #[error("resolver error: {0}")]
    Resolver(String),

    #[error("parser error: {0}")]
    Parser(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ScraperError {
    /// Machine-readable error code, used for log filtering and alert rows.
    pub fn code(&self) -> &'static str {
        match self {
            ScraperError::Database(_) => "DATABASE_ERROR",
            ScraperError::Http(_) => "HTTP_ERROR",
            ScraperError::Maintenance { .. } => "MAINTENANCE",
            ScraperError::CircuitBreakerTripped { .. } => "CIRCUIT_BREAKER_TRIPPED",
            ScraperError::Cancelled => "CANCELLED",
            ScraperError::PauseTimeout => "PAUSE_TIMEOUT",
            ScraperError::Resolver(_) => "RESOLVER_ERROR",
            ScraperError::Parser(_) => "PARSER_ERROR",
            ScraperError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether this condition should persist a `ScraperAlert` row.
    pub fn is_alertable(&self) -> bool {
        matches!(
            self,
            ScraperError::Maintenance { .. } | ScraperError::CircuitBreakerTripped { .. }
        )
    }
}

/// Per-listing error classification from the error-handling design. These
/// never become a [`ScraperError`] — they drive counters and log events only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    HardHttp,
    SoftHttp,
    ParseMiss,
    CrossCheckFailure,
    SuspiciousUpdate,
}

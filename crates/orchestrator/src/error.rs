//! Run-level error taxonomy (§7). Per-listing conditions are never
//! constructed as an `OrchestratorError` at all — they are recorded into
//! the `ProgressSnapshot` counters and a `tracing` event, and the loop
//! continues. Only the conditions below ever unwind a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("resolver error: {0}")]
    Resolver(#[from] resolver::ResolverError),

    #[error("retry gate error: {0}")]
    RetryGate(#[from] retry_gate::RetryGateError),

    #[error("site returned a maintenance page or 503 for {source_site}")]
    Maintenance { source_site: String },

    #[error("circuit breaker tripped: {reason}")]
    CircuitBreakerTripped { reason: String },

    #[error("task was cancelled")]
    Cancelled,

    #[error("pause exceeded timeout and was escalated to cancel")]
    PauseTimeout,
}

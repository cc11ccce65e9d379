use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetryGateError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

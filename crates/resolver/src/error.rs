use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("ambiguous resolution: {0}")]
    Ambiguous(String),
}

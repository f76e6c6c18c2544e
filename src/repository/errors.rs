use diesel::r2d2::PoolError;
use thiserror::Error;

/// Result type returned by all repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Could not obtain a connection from the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// Underlying Diesel/SQLite failure.
    #[error("database error: {0}")]
    Database(diesel::result::Error),
    /// The targeted record does not exist in the caller's hub.
    #[error("record not found")]
    NotFound,
    /// A stored column could not be decoded into its domain form.
    #[error("stored data could not be decoded: {0}")]
    Conversion(String),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => RepositoryError::NotFound,
            other => RepositoryError::Database(other),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Conversion(err.to_string())
    }
}

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod digital_products;
pub mod main;
pub mod price_rules;
pub mod products;
pub mod purchase_orders;
pub mod suppliers;
pub mod vouchers;

/// Result type returned by all service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer to route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The authenticated user lacks the required role.
    #[error("unauthorized")]
    Unauthorized,
    /// The requested record does not exist in the user's hub.
    #[error("not found")]
    NotFound,
    /// A form failed validation; the message is user-facing.
    #[error("{0}")]
    Form(String),
    /// Underlying storage failure.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

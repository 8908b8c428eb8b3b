use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("Connection pool error: {0}")]
    ConnectionPoolError(#[from] diesel::r2d2::PoolError),
}

impl From<crate::services::pricing::PricingError> for RepositoryError {
    fn from(e: crate::services::pricing::PricingError) -> Self {
        RepositoryError::ValidationError(e.to_string())
    }
}

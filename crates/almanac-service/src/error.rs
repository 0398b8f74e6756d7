use thiserror::Error;

use almanac_core::error::CoreError;
use almanac_db::error::DbError;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(CoreError),

    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ServiceError {
    /// ## Summary
    /// Whether the failure came from an unreachable or overloaded backing store,
    /// as opposed to a problem with the request itself.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::StoreUnavailable(_) => true,
            Self::DatabaseError(err) => err.is_transient(),
            Self::CoreError(_)
            | Self::AuthorizationError(_)
            | Self::NotFound(_)
            | Self::InvariantViolation(_)
            | Self::ValidationError(_) => false,
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(reason) => Self::ValidationError(reason),
            CoreError::NotFound(what) => Self::NotFound(what),
            CoreError::InvariantViolation(what) => Self::InvariantViolation(what),
            other @ (CoreError::ConfigError(_) | CoreError::InvalidInput(_)) => {
                Self::CoreError(other)
            }
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

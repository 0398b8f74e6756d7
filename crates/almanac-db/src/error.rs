use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    CoreError(#[from] almanac_core::error::CoreError),
}

impl DbError {
    /// ## Summary
    /// Whether retrying the same operation later could succeed.
    ///
    /// Pool exhaustion and dropped connections are transient; constraint
    /// violations and malformed rows are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::PoolError(_) => true,
            Self::DatabaseError(err) => matches!(
                err,
                diesel::result::Error::BrokenTransactionManager
                    | diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::ClosedConnection
                            | diesel::result::DatabaseErrorKind::SerializationFailure,
                        _
                    )
            ),
            Self::MigrationError(_) | Self::CoreError(_) => false,
        }
    }
}

pub type DbResult<T> = std::result::Result<T, DbError>;

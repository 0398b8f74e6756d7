use std::future::Future;
use std::time::Duration;

use salvo::http::StatusCode;
use salvo::writing::Json;
use serde::Serialize;
use thiserror::Error;

use almanac_core::error::CoreError;
use almanac_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    CoreError(#[from] CoreError),

    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl AppError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => match err {
                ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::AuthorizationError(_) | ServiceError::InvariantViolation(_) => {
                    StatusCode::FORBIDDEN
                }
                ServiceError::CoreError(CoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
                other if other.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CoreError(err) => match err {
                CoreError::ValidationError(_) | CoreError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::InvariantViolation(_) | CoreError::ConfigError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Message safe to return to clients. Server-side failures are not described.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            StatusCode::SERVICE_UNAVAILABLE => "Service temporarily unavailable".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// ## Summary
/// Writes `err` as a JSON error response with its mapped status.
pub fn render_error(res: &mut salvo::Response, err: &AppError) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = %err, status = status.as_u16(), "Request failed");
    } else {
        tracing::debug!(error = %err, status = status.as_u16(), "Request rejected");
    }

    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: err.public_message(),
    }));
}

/// ## Summary
/// Runs a service call under the request deadline. A call that outlives it is
/// dropped, cancelling its in-flight lookups.
///
/// ## Errors
/// `AppError::Timeout` when the deadline passes; otherwise the call's own error.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> AppResult<T>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_elapsed| AppError::Timeout(deadline))?
        .map_err(AppError::from)
}

// Service error types and their HTTP mapping
use axum::http::StatusCode;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::types::Operation;
use crate::validation::ValidationErrors;

/// Failure of a project operation, before it is turned into a client response
#[derive(Debug, Error)]
pub enum ServiceError {
    // 400 Bad Request
    #[error("{0}")]
    Validation(ValidationErrors),

    // 401 Unauthorized
    #[error("Unauthorized")]
    Unauthorized,

    // 403 Forbidden, same text as 401 so callers cannot probe for other users' ids
    #[error("Unauthorized")]
    Forbidden,

    // 404 Not Found
    #[error("Project not found")]
    NotFound,

    // 500 Internal Server Error
    #[error("storage failure: {0}")]
    Persistence(DatabaseError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Unauthorized => "UNAUTHORIZED",
            ServiceError::Forbidden => "FORBIDDEN",
            ServiceError::NotFound => "NOT_FOUND",
            ServiceError::Persistence(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Client-safe message. Storage failures never expose their detail.
    pub fn client_message(&self, operation: Operation) -> String {
        match self {
            ServiceError::Validation(errors) => errors.first_message().to_string(),
            ServiceError::Persistence(_) => operation.failure_message(),
            other => other.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Persistence(_))
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // Row vanished between lookup and write
            DatabaseError::NotFound(_) => ServiceError::NotFound,
            other => ServiceError::Persistence(other),
        }
    }
}

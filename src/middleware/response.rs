use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::ServiceError;
use crate::types::Operation;
use crate::validation::INVALID_FORM_DATA;

/// Outcome envelope returned by every project operation.
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`. The HTTP status is carried
/// alongside but is not part of the body.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success { data: T, status: StatusCode },
    Failure { error: String, status: StatusCode },
}

impl<T> ActionResult<T> {
    /// 200 OK success
    pub fn success(data: T) -> Self {
        Self::Success {
            data,
            status: StatusCode::OK,
        }
    }

    pub fn failure(error: impl Into<String>, status: StatusCode) -> Self {
        Self::Failure {
            error: error.into(),
            status,
        }
    }

    /// Convert a service outcome, logging unexpected failures
    pub fn from_result(result: Result<T, ServiceError>, operation: Operation) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_error(err, operation),
        }
    }

    pub fn from_error(err: ServiceError, operation: Operation) -> Self {
        if err.is_internal() {
            tracing::error!("Failed to {} project: {}", operation.verb(), err);
        } else {
            tracing::debug!("{} project rejected: {}", operation.verb(), err);
        }
        Self::failure(err.client_message(operation), err.status_code())
    }

    /// A request body the extractor could not parse
    pub fn invalid_body(rejection: impl std::fmt::Display) -> Self {
        tracing::debug!("Rejected request body: {}", rejection);
        Self::failure(INVALID_FORM_DATA, StatusCode::BAD_REQUEST)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { status, .. } | Self::Failure { status, .. } => *status,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error.as_str()),
        }
    }

    pub fn with_status(self, new_status: StatusCode) -> Self {
        match self {
            Self::Success { data, .. } => Self::Success { data, status: new_status },
            failure => failure,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Success { data, status } => ActionResult::Success { data: f(data), status },
            Self::Failure { error, status } => ActionResult::Failure { error, status },
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("ActionResult", 2)?;
        match self {
            Self::Success { data, .. } => {
                envelope.serialize_field("success", &true)?;
                envelope.serialize_field("data", data)?;
            }
            Self::Failure { error, .. } => {
                envelope.serialize_field("success", &false)?;
                envelope.serialize_field("error", error)?;
            }
        }
        envelope.end()
    }
}

impl<T: Serialize> IntoResponse for ActionResult<T> {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self)).into_response()
    }
}

use axum::http::HeaderMap;
use serde::Serialize;

use super::session::SessionCodec;
use crate::error::ServiceError;

/// The signed-in user, identified by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub email: String,
}

impl Principal {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// Principal for the request's session cookie, if any
pub fn current_principal(codec: &SessionCodec, headers: &HeaderMap) -> Option<Principal> {
    codec.read(headers).map(Principal::new)
}

pub fn require_authenticated(principal: Option<&Principal>) -> Result<&Principal, ServiceError> {
    principal.ok_or(ServiceError::Unauthorized)
}

/// Only the owner may act on a resource
pub fn require_ownership(resource_owner: &str, principal: &Principal) -> Result<(), ServiceError> {
    if resource_owner == principal.email {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

//! `AdminCaller` extractor: pulls the admin key from the Authorization header.
//!
//! The extractor only parses the credential. Whether it belongs to an admin
//! is decided by the booking service's `AdminAuthority`.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use seatbook_core::error::AppError;
use seatbook_core::types::AdminIdentity;

use crate::error::ApiError;

/// Credential presented by an admin caller.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub AdminIdentity);

impl AdminCaller {
    /// Returns the presented identity.
    pub fn identity(&self) -> &AdminIdentity {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AdminCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let key = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        Ok(AdminCaller(AdminIdentity::new(key)))
    }
}

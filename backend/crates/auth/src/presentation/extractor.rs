//! Principal extractor for handlers behind [`require_jwt`](super::middleware::require_jwt)

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::principal::Principal;
use crate::error::AuthError;

/// The authenticated caller; rejects with 401 when the request carries none
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl CurrentUser {
    /// 403 unless the caller holds `ROLE_<role>`
    pub fn require_role(&self, role: &str) -> Result<&Principal, AuthError> {
        if self.0.has_role(role) {
            Ok(&self.0)
        } else {
            Err(AuthError::MissingRole(role.to_string()))
        }
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::Unauthenticated)
    }
}

//! Auth Middleware
//!
//! Bearer JWT authentication for every route outside the public allow-list.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::TokenVerifier;
use crate::error::AuthError;
use crate::presentation::access::PublicPaths;

/// Middleware state
pub struct JwtAuthState<V>
where
    V: TokenVerifier + Send + Sync + 'static,
{
    pub verifier: Arc<V>,
    pub config: Arc<AuthConfig>,
    pub public_paths: Arc<PublicPaths>,
}

impl<V> Clone for JwtAuthState<V>
where
    V: TokenVerifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            verifier: Arc::clone(&self.verifier),
            config: Arc::clone(&self.config),
            public_paths: Arc::clone(&self.public_paths),
        }
    }
}

impl<V> JwtAuthState<V>
where
    V: TokenVerifier + Send + Sync + 'static,
{
    pub fn new(verifier: Arc<V>, config: Arc<AuthConfig>) -> Self {
        Self {
            verifier,
            config,
            public_paths: Arc::new(PublicPaths::default()),
        }
    }
}

/// Token from `Authorization: Bearer <jwt>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid bearer token unless the path is public
///
/// CORS preflight requests always pass. On success the [`Principal`]
/// is stored in the request extensions for [`CurrentUser`]; on public
/// paths a valid token is attached the same way but never required.
///
/// [`Principal`]: crate::domain::principal::Principal
/// [`CurrentUser`]: crate::presentation::extractor::CurrentUser
pub async fn require_jwt<V>(
    State(state): State<JwtAuthState<V>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    V: TokenVerifier + Send + Sync + 'static,
{
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(req.headers()).map(str::to_string);
    let use_case = AuthenticateUseCase::new(state.verifier.clone(), state.config.clone());

    if state.public_paths.is_public(req.uri().path()) {
        // Public routes still see the caller when a valid token is sent.
        if let Some(token) = token {
            if let Ok(principal) = use_case.execute(&token).await {
                req.extensions_mut().insert(principal);
            }
        }
        return Ok(next.run(req).await);
    }

    let token = token.ok_or(AuthError::Unauthenticated)?;
    let principal = use_case.execute(&token).await?;

    tracing::trace!(subject = %principal.subject, path = %req.uri().path(), "Authenticated request");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}

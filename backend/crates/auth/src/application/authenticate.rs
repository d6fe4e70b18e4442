//! Authenticate Use Case
//!
//! Turns a bearer token into a [`Principal`].

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::principal::Principal;
use crate::domain::repository::TokenVerifier;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<V>
where
    V: TokenVerifier,
{
    verifier: Arc<V>,
    config: Arc<AuthConfig>,
}

impl<V> AuthenticateUseCase<V>
where
    V: TokenVerifier,
{
    pub fn new(verifier: Arc<V>, config: Arc<AuthConfig>) -> Self {
        Self { verifier, config }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<Principal> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        let claims = self.verifier.verify(token).await?;
        if claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("token has no subject".to_string()));
        }

        Ok(Principal::from_claims(&claims, &self.config.client_id))
    }
}

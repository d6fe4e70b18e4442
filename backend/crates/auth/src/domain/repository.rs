//! Ports
//!
//! Interfaces to the identity provider. Implementations are in the
//! infrastructure layer.

use crate::domain::authority::TokenClaims;
use crate::domain::registration::NewUser;
use crate::error::AuthResult;

/// User administration on the identity provider
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Create a disabled, unverified account and return its id
    async fn create_user(&self, user: &NewUser) -> AuthResult<String>;

    /// Set a permanent password on an existing account
    async fn set_password(&self, user_id: &str, password: &str) -> AuthResult<()>;
}

/// Bearer token validation
#[trait_variant::make(TokenVerifier: Send)]
pub trait LocalTokenVerifier {
    /// Verify signature, expiry and issuer; return the claims
    async fn verify(&self, token: &str) -> AuthResult<TokenClaims>;
}

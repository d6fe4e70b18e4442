//! Infrastructure Layer
//!
//! Keycloak adapters.

pub mod jwks;
pub mod keycloak;

pub use jwks::JwksVerifier;
pub use keycloak::KeycloakAdminClient;

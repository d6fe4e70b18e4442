//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Principal, authorities, registration value objects, ports
//! - `application/` - Use cases and configuration
//! - `infra/` - Keycloak admin client, JWKS-backed token verifier
//! - `presentation/` - HTTP handlers, DTOs, router, JWT middleware
//!
//! ## Features
//! - Bearer JWT validation against the Keycloak realm's JWKS
//! - Realm roles, client roles and scopes mapped to authorities
//! - Public path allow-list evaluated before authentication
//! - Self-registration through the Keycloak admin REST API
//!   (accounts are created disabled, pending admin activation)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::principal::Principal;
pub use error::{AuthError, AuthResult};
pub use infra::jwks::JwksVerifier;
pub use infra::keycloak::KeycloakAdminClient;
pub use presentation::extractor::CurrentUser;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::authority::*;
    pub use crate::domain::principal::*;
    pub use crate::domain::registration::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::access::*;
    pub use crate::presentation::middleware::*;
}

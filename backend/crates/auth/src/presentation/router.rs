//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::IdentityProvider;
use crate::infra::keycloak::KeycloakAdminClient;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router backed by the Keycloak admin API
pub fn auth_router(provider: KeycloakAdminClient, config: Arc<AuthConfig>) -> Router {
    auth_router_generic(provider, config)
}

/// Create a generic Auth router for any identity provider
pub fn auth_router_generic<P>(provider: P, config: Arc<AuthConfig>) -> Router
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let state = AuthAppState {
        provider: Arc::new(provider),
        config,
    };

    Router::new()
        .route("/register", post(handlers::register::<P>))
        .route("/status", get(handlers::status))
        .route("/me", get(handlers::me))
        .with_state(state)
}

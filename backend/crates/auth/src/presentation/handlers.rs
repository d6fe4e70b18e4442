//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{RegisterUserInput, RegisterUserUseCase};
use crate::domain::repository::IdentityProvider;
use crate::error::AuthResult;
use crate::presentation::dto::{MeResponse, RegisterRequest, RegisterResponse};
use crate::presentation::extractor::CurrentUser;

pub const STATUS_MESSAGE: &str = "Auth API is running!";

/// Shared state for auth handlers
pub struct AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    pub provider: Arc<P>,
    pub config: Arc<AuthConfig>,
}

impl<P> Clone for AuthAppState<P>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Registration
// ============================================================================

/// POST /auth/register
pub async fn register<P>(
    State(state): State<AuthAppState<P>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = RegisterUserUseCase::new(state.provider.clone());

    let input = RegisterUserInput {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: output.message.to_string(),
            user_id: output.user_id,
        }),
    ))
}

// ============================================================================
// Status
// ============================================================================

/// GET /auth/status
pub async fn status() -> &'static str {
    STATUS_MESSAGE
}

/// GET /auth/me
pub async fn me(CurrentUser(principal): CurrentUser) -> Json<MeResponse> {
    Json(principal.into())
}

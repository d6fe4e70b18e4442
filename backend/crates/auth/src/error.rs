//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on a protected route
    #[error("Authentication required")]
    Unauthenticated,

    /// Token present but rejected (signature, expiry, issuer, unknown key)
    #[error("Invalid token")]
    InvalidToken(String),

    /// Authenticated but missing the required role
    #[error("Access denied: {0} role required")]
    MissingRole(String),

    /// Registration payload rejected
    #[error("{0}")]
    Validation(String),

    /// Keycloak already has this username or email
    #[error("Error creating user: {0}")]
    UserExists(u16),

    /// Keycloak answered with an unexpected status
    #[error("Error creating user: {0}")]
    UpstreamStatus(u16),

    /// Keycloak could not be reached or answered garbage
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::MissingRole(_) => StatusCode::FORBIDDEN,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::UserExists(_) => StatusCode::CONFLICT,
            AuthError::UpstreamStatus(_) | AuthError::IdentityProvider(_) => {
                StatusCode::BAD_GATEWAY
            }
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidToken(_) => ErrorKind::Unauthorized,
            AuthError::MissingRole(_) => ErrorKind::Forbidden,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::UserExists(_) => ErrorKind::Conflict,
            AuthError::UpstreamStatus(_) | AuthError::IdentityProvider(_) => ErrorKind::BadGateway,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::UpstreamStatus(_) => err.expose_message(),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::IdentityProvider(msg) => {
                tracing::error!(message = %msg, "Keycloak request failed");
            }
            AuthError::UpstreamStatus(status) => {
                tracing::error!(status, "Keycloak rejected user creation");
            }
            AuthError::InvalidToken(reason) => {
                tracing::warn!(reason = %reason, "Rejected bearer token");
            }
            AuthError::MissingRole(role) => {
                tracing::warn!(role = %role, "Access denied for missing role");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::IdentityProvider(err.to_string())
    }
}

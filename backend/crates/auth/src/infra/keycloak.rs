//! Keycloak admin REST client
//!
//! Authenticates as the backend service client (`client_credentials`) and
//! manages users in the target realm. The admin token is cached and
//! renewed shortly before it expires.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::LOCATION;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::application::config::AuthConfig;
use crate::domain::registration::NewUser;
use crate::domain::repository::IdentityProvider;
use crate::error::{AuthError, AuthResult};

/// Token endpoint reply (only the fields we use)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRepresentation<'a> {
    username: &'a str,
    email: &'a str,
    enabled: bool,
    email_verified: bool,
}

#[derive(Debug, Serialize)]
struct CredentialRepresentation<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
    temporary: bool,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    renew_at: Instant,
}

/// Keycloak admin API client
#[derive(Clone)]
pub struct KeycloakAdminClient {
    http: reqwest::Client,
    config: Arc<AuthConfig>,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl KeycloakAdminClient {
    pub fn new(config: Arc<AuthConfig>) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: Arc<AuthConfig>) -> Self {
        Self {
            http,
            config,
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// Current admin access token, fetching a new one when needed
    pub async fn admin_token(&self) -> AuthResult<String> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.renew_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.fetch_admin_token().await?;
        let lifetime = Duration::from_secs(fresh.expires_in);
        let renew_at = Instant::now() + lifetime.saturating_sub(self.config.admin_token_skew);

        tracing::debug!(expires_in = fresh.expires_in, "Obtained Keycloak admin token");

        *cached = Some(CachedToken {
            access_token: fresh.access_token.clone(),
            renew_at,
        });
        Ok(fresh.access_token)
    }

    async fn fetch_admin_token(&self) -> AuthResult<TokenResponse> {
        let response = self
            .http
            .post(self.config.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::IdentityProvider(format!(
                "token endpoint answered {}",
                response.status()
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::IdentityProvider(format!("malformed token response: {e}")))
    }
}

impl IdentityProvider for KeycloakAdminClient {
    async fn create_user(&self, user: &NewUser) -> AuthResult<String> {
        let token = self.admin_token().await?;

        let body = UserRepresentation {
            username: user.username.as_str(),
            email: user.email.as_str(),
            enabled: false,
            email_verified: false,
        };

        let response = self
            .http
            .post(self.config.users_url())
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {}
            StatusCode::CONFLICT => return Err(AuthError::UserExists(StatusCode::CONFLICT.as_u16())),
            status => return Err(AuthError::UpstreamStatus(status.as_u16())),
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AuthError::IdentityProvider("user created without a Location header".to_string())
            })?;

        user_id_from_location(location).ok_or_else(|| {
            AuthError::IdentityProvider(format!("cannot read user id from Location: {location}"))
        })
    }

    async fn set_password(&self, user_id: &str, password: &str) -> AuthResult<()> {
        let token = self.admin_token().await?;

        let body = CredentialRepresentation {
            kind: "password",
            value: password,
            temporary: false,
        };

        let response = self
            .http
            .put(format!("{}/{}/reset-password", self.config.users_url(), user_id))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::IdentityProvider(format!(
                "reset-password answered {} for user {user_id}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Last path segment of a `Location` header (`.../users/<id>` → `<id>`)
pub fn user_id_from_location(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty() && !id.contains(':'))
        .map(str::to_string)
}

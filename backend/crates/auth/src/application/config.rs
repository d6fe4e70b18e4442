//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::config::{ConfigError, env_list, env_opt, env_or, env_parse_or, read_secret};

/// Default location of the Docker secret holding the service client secret
pub const DEFAULT_CLIENT_SECRET_FILE: &str = "/run/secrets/KEYCLOAK_BACKEND_CLIENT_SECRET";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Keycloak base URL as reachable from this service
    pub keycloak_url: String,
    /// Realm that issues user tokens and receives new accounts
    pub realm: String,
    /// Realm of the service client used for the admin API
    pub admin_realm: String,
    /// Service client (client_credentials grant)
    pub client_id: String,
    pub client_secret: String,
    /// `iss` values accepted on user tokens
    pub accepted_issuers: Vec<String>,
    pub jwks_url: String,
    /// Clock skew tolerated on `exp` / `nbf`
    pub leeway: Duration,
    /// Minimum time between two JWKS downloads triggered by unknown `kid`s
    pub jwks_refresh_cooldown: Duration,
    /// Admin tokens are renewed this long before they expire
    pub admin_token_skew: Duration,
    /// Timeout for every outbound Keycloak request
    pub http_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::for_realm("http://keycloak:8080", "Ecommerce", "backend-client", "")
    }
}

impl AuthConfig {
    /// Config with every URL derived from the server and realm
    pub fn for_realm(keycloak_url: &str, realm: &str, client_id: &str, client_secret: &str) -> Self {
        let keycloak_url = keycloak_url.trim_end_matches('/').to_string();
        Self {
            accepted_issuers: vec![issuer_url(&keycloak_url, realm)],
            jwks_url: format!("{}/protocol/openid-connect/certs", issuer_url(&keycloak_url, realm)),
            keycloak_url,
            realm: realm.to_string(),
            admin_realm: realm.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            leeway: Duration::from_secs(30),
            jwks_refresh_cooldown: Duration::from_secs(30),
            admin_token_skew: Duration::from_secs(30),
            http_timeout: Duration::from_secs(10),
        }
    }

    /// Load from `KEYCLOAK_*`, `JWT_ACCEPTED_ISSUERS` and `JWKS_URL`
    pub fn from_env() -> Result<Self, ConfigError> {
        let keycloak_url = env_or("KEYCLOAK_URL", "http://keycloak:8080");
        let realm = env_or("KEYCLOAK_REALM", "Ecommerce");
        let client_id = env_or("KEYCLOAK_CLIENT_ID", "backend-client");
        let client_secret = read_secret(
            "KEYCLOAK_CLIENT_SECRET_FILE",
            "KEYCLOAK_CLIENT_SECRET",
            Some(DEFAULT_CLIENT_SECRET_FILE),
        )?;

        let mut config = Self::for_realm(&keycloak_url, &realm, &client_id, &client_secret);

        if let Some(admin_realm) = env_opt("KEYCLOAK_ADMIN_REALM") {
            config.admin_realm = admin_realm;
        }
        if let Some(issuers) = env_list("JWT_ACCEPTED_ISSUERS") {
            config.accepted_issuers = issuers
                .into_iter()
                .map(|i| i.trim_end_matches('/').to_string())
                .collect();
        }
        if let Some(jwks_url) = env_opt("JWKS_URL") {
            config.jwks_url = jwks_url;
        }
        config.leeway = Duration::from_secs(env_parse_or("JWT_LEEWAY_SECS", 30u64)?);

        Ok(config)
    }

    /// `{server}/realms/{realm}`
    pub fn issuer(&self) -> String {
        issuer_url(&self.keycloak_url, &self.realm)
    }

    /// Token endpoint of the service client's realm
    pub fn token_url(&self) -> String {
        format!(
            "{}/protocol/openid-connect/token",
            issuer_url(&self.keycloak_url, &self.admin_realm)
        )
    }

    /// Admin users collection of the target realm
    pub fn users_url(&self) -> String {
        format!("{}/admin/realms/{}/users", self.keycloak_url, self.realm)
    }
}

fn issuer_url(keycloak_url: &str, realm: &str) -> String {
    format!("{keycloak_url}/realms/{realm}")
}

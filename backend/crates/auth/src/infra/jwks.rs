//! JWKS-backed token verifier
//!
//! Keys are downloaded from the realm's certificate endpoint and cached by
//! `kid`. A token signed with an unknown `kid` triggers a refresh, at most
//! once per cooldown window, so key rotation is picked up without letting
//! random `kid`s hammer Keycloak.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::jwk::{AlgorithmParameters, JwkSet, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::application::config::AuthConfig;
use crate::domain::authority::TokenClaims;
use crate::domain::repository::TokenVerifier;
use crate::error::{AuthError, AuthResult};

const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];

#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

/// Verifies RS256/384/512 tokens against a JWKS endpoint
#[derive(Clone)]
pub struct JwksVerifier {
    http: reqwest::Client,
    jwks_url: String,
    accepted_issuers: Vec<String>,
    leeway: Duration,
    refresh_cooldown: Duration,
    cache: Arc<RwLock<KeyCache>>,
}

impl JwksVerifier {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            jwks_url: config.jwks_url.clone(),
            accepted_issuers: config.accepted_issuers.clone(),
            leeway: config.leeway,
            refresh_cooldown: config.jwks_refresh_cooldown,
            cache: Arc::new(RwLock::new(KeyCache::default())),
        })
    }

    /// Number of keys currently cached
    pub async fn cached_keys(&self) -> usize {
        self.cache.read().await.keys.len()
    }

    /// Download the key set and replace the cache
    pub async fn refresh(&self) -> AuthResult<usize> {
        let mut cache = self.cache.write().await;
        self.refresh_locked(&mut cache).await
    }

    async fn refresh_locked(&self, cache: &mut KeyCache) -> AuthResult<usize> {
        cache.fetched_at = Some(Instant::now());

        let response = self.http.get(&self.jwks_url).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::IdentityProvider(format!(
                "JWKS endpoint answered {}",
                response.status()
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::IdentityProvider(format!("malformed JWKS: {e}")))?;

        cache.keys = signing_keys(&set);
        tracing::info!(keys = cache.keys.len(), url = %self.jwks_url, "Loaded JWKS");
        Ok(cache.keys.len())
    }

    async fn key_for(&self, kid: &str) -> AuthResult<DecodingKey> {
        if let Some(key) = self.cache.read().await.keys.get(kid) {
            return Ok(key.clone());
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(key) = cache.keys.get(kid) {
            return Ok(key.clone());
        }

        let cooling_down = cache
            .fetched_at
            .is_some_and(|at| at.elapsed() < self.refresh_cooldown);
        if !cooling_down {
            self.refresh_locked(&mut cache).await?;
        }

        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown signing key {kid}")))
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.leeway = self.leeway.as_secs();
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if !self.accepted_issuers.is_empty() {
            validation.set_issuer(&self.accepted_issuers);
        }
        validation
    }
}

impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::InvalidToken(format!(
                "algorithm {:?} not accepted",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token header has no kid".to_string()))?;
        let key = self.key_for(&kid).await?;

        decode::<TokenClaims>(token, &key, &self.validation(header.alg))
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// RSA signing keys of a JWKS, by `kid`
fn signing_keys(set: &JwkSet) -> HashMap<String, DecodingKey> {
    set.keys
        .iter()
        .filter(|jwk| !matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)))
        .filter_map(|jwk| {
            let kid = jwk.common.key_id.clone()?;
            match &jwk.algorithm {
                AlgorithmParameters::RSA(rsa) => {
                    match DecodingKey::from_rsa_components(&rsa.n, &rsa.e) {
                        Ok(key) => Some((kid, key)),
                        Err(e) => {
                            tracing::warn!(kid = %kid, error = %e, "Skipping malformed JWK");
                            None
                        }
                    }
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_keys_keeps_rsa_sig_keys_only() {
        let set: JwkSet = serde_json::from_value(serde_json::json!({
            "keys": [
                { "kid": "sig-1", "kty": "RSA", "alg": "RS256", "use": "sig", "n": "sXch", "e": "AQAB" },
                { "kid": "enc-1", "kty": "RSA", "alg": "RSA-OAEP", "use": "enc", "n": "sXch", "e": "AQAB" },
                { "kty": "RSA", "n": "sXch", "e": "AQAB" },
                { "kid": "hmac", "kty": "oct", "k": "c2VjcmV0" }
            ]
        }))
        .unwrap();

        let keys = signing_keys(&set);
        assert_eq!(keys.len(), 1);
        assert!(keys.contains_key("sig-1"));
    }
}

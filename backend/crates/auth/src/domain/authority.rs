//! Token claims and the authorities derived from them
//!
//! Keycloak places roles in two places: `realm_access.roles` for realm
//! roles and `resource_access.<client>.roles` for client roles. Both are
//! exposed as `ROLE_<name>`; OAuth scopes become `SCOPE_<name>`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const ROLE_PREFIX: &str = "ROLE_";
pub const SCOPE_PREFIX: &str = "SCOPE_";

/// Role list container (`{"roles": [...]}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Claims read from a Keycloak access token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Space separated scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_access: Option<RoleSet>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub resource_access: HashMap<String, RoleSet>,
}

/// Authorities granted by `claims`, de-duplicated in first-seen order
///
/// Realm roles come first, then the roles of `client_id`, then scopes.
pub fn authorities(claims: &TokenClaims, client_id: &str) -> Vec<String> {
    let realm_roles = claims
        .realm_access
        .iter()
        .flat_map(|access| access.roles.iter());

    let client_roles = claims
        .resource_access
        .get(client_id)
        .into_iter()
        .flat_map(|access| access.roles.iter());

    let roles = realm_roles
        .chain(client_roles)
        .filter(|role| !role.is_empty())
        .map(|role| format!("{ROLE_PREFIX}{role}"));

    let scopes = claims
        .scope
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(|scope| format!("{SCOPE_PREFIX}{scope}"));

    let mut out: Vec<String> = Vec::new();
    for authority in roles.chain(scopes) {
        if !out.contains(&authority) {
            out.push(authority);
        }
    }
    out
}

//! Authenticated caller

use serde::Serialize;

use super::authority::{self, ROLE_PREFIX, TokenClaims};

/// Realm role that unlocks catalog administration
pub const ADMIN_ROLE: &str = "admin";

/// The caller behind a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Keycloak user id (`sub`)
    pub subject: String,
    /// `preferred_username`
    pub username: Option<String>,
    pub email: Option<String>,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn from_claims(claims: &TokenClaims, client_id: &str) -> Self {
        Self {
            subject: claims.sub.clone(),
            username: claims.preferred_username.clone(),
            email: claims.email.clone(),
            authorities: authority::authorities(claims, client_id),
        }
    }

    /// `preferred_username`, falling back to the subject
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.subject)
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Role check without the `ROLE_` prefix (`has_role("admin")`)
    pub fn has_role(&self, role: &str) -> bool {
        self.authorities
            .iter()
            .filter_map(|a| a.strip_prefix(ROLE_PREFIX))
            .any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::authority::RoleSet;

    fn principal(username: Option<&str>, roles: &[&str]) -> Principal {
        let claims = TokenClaims {
            sub: "5d1c-sub".to_string(),
            preferred_username: username.map(str::to_string),
            email: Some("ana@example.com".to_string()),
            realm_access: Some(RoleSet {
                roles: roles.iter().map(|r| r.to_string()).collect(),
            }),
            ..TokenClaims::default()
        };
        Principal::from_claims(&claims, "backend-client")
    }

    #[test]
    fn test_display_name_falls_back_to_subject() {
        assert_eq!(principal(Some("ana"), &[]).display_name(), "ana");
        assert_eq!(principal(None, &[]).display_name(), "5d1c-sub");
        assert_eq!(principal(Some(""), &[]).display_name(), "5d1c-sub");
    }

    #[test]
    fn test_role_checks() {
        let admin = principal(Some("root"), &["admin", "user"]);
        assert!(admin.is_admin());
        assert!(admin.has_authority("ROLE_user"));
        assert!(!admin.has_role("ROLE_admin"));

        let user = principal(Some("ana"), &["user"]);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(principal(Some("ana"), &["user"])).unwrap();
        assert_eq!(json["subject"], "5d1c-sub");
        assert_eq!(json["authorities"][0], "ROLE_user");
    }
}

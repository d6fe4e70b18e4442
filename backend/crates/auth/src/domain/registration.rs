//! Registration Value Objects
//!
//! Validated input for self-registration. Keycloak enforces its own
//! policies on top; these checks reject obviously bad input before any
//! admin token is spent.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AuthError, AuthResult};

const USERNAME_MIN_LENGTH: usize = 3;
const USERNAME_MAX_LENGTH: usize = 64;
/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;
const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_MAX_LENGTH: usize = 128;

static USERNAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+$").unwrap_or_else(|e| panic!("invalid username pattern: {e}"))
});

// ============================================================================
// Username
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let value = raw.into().trim().to_string();
        let len = value.chars().count();

        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
            return Err(AuthError::Validation(format!(
                "Username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            )));
        }

        if !USERNAME_CHARS.is_match(&value) {
            return Err(AuthError::Validation(
                "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Email
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let email = raw.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AuthError::Validation("Email cannot be empty".to_string()));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Email must be at most {EMAIL_MAX_LENGTH} characters"
            )));
        }

        if !Self::is_valid_format(&email) {
            return Err(AuthError::Validation("Invalid email format".to_string()));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Password
// ============================================================================

/// Plain password on its way to Keycloak; never logged
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let value = raw.into();
        let len = value.chars().count();

        if len < PASSWORD_MIN_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {PASSWORD_MIN_LENGTH} characters"
            )));
        }

        if len > PASSWORD_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at most {PASSWORD_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// A validated self-registration request
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password: Password,
}

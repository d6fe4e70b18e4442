//! Contact Email Value Object (`correo`)

use std::fmt;

use platform::sanitize::contains_script_injection;

use crate::error::{CustomerError, CustomerResult};

/// Maximum email length (per RFC 5321)
pub const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn new(raw: impl Into<String>) -> CustomerResult<Self> {
        let value = raw.into().trim().to_lowercase();

        let well_formed = value
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.contains('@'));

        if !well_formed || value.len() > EMAIL_MAX_LENGTH || contains_script_injection(&value) {
            return Err(CustomerError::Validation("Invalid email address".to_string()));
        }

        Ok(Self(value))
    }

    /// Blank input means "no email"
    pub fn optional(raw: Option<&str>) -> CustomerResult<Option<Self>> {
        match raw.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Self::new(value).map(Some),
            None => Ok(None),
        }
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

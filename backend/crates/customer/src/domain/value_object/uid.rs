//! Client UID Value Object
//!
//! The identity provider's subject (`sub`) of the client.

use std::fmt;

use crate::error::{CustomerError, CustomerResult};

pub const UID_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid(String);

impl Uid {
    pub fn new(raw: impl Into<String>) -> CustomerResult<Self> {
        let value = raw.into().trim().to_string();

        if value.is_empty() {
            return Err(CustomerError::Validation("Client uid is required".to_string()));
        }
        if value.len() > UID_MAX_LENGTH || value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CustomerError::Validation("Invalid client uid".to_string()));
        }

        Ok(Self(value))
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid() {
        assert_eq!(
            Uid::new(" 0b7e1f1c-9a2d ").unwrap().as_str(),
            "0b7e1f1c-9a2d"
        );
        assert!(Uid::new("").is_err());
        assert!(Uid::new("a b").is_err());
        assert!(Uid::new("x".repeat(UID_MAX_LENGTH + 1)).is_err());
    }
}

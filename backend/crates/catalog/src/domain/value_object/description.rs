//! Product Description Value Object

use std::fmt;

use platform::sanitize::contains_script_injection;

use crate::error::{CatalogError, CatalogResult};

pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

/// Trimmed, non-blank, at most 1000 characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(raw: impl Into<String>) -> CatalogResult<Self> {
        let value = raw.into().trim().to_string();

        if value.is_empty() {
            return Err(CatalogError::Validation("Product description is required".to_string()));
        }

        if value.chars().count() > DESCRIPTION_MAX_LENGTH {
            return Err(CatalogError::Validation(format!(
                "Product description must be at most {DESCRIPTION_MAX_LENGTH} characters"
            )));
        }

        if contains_script_injection(&value) {
            return Err(CatalogError::ForbiddenContent("Product description"));
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

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

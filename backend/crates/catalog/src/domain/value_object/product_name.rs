//! Product Name Value Object
//!
//! ## Invariants
//! - Trimmed, non-blank
//! - At most 255 characters
//! - No executable markup (`<script>`, `javascript:`, event handlers)

use std::fmt;

use platform::sanitize::contains_script_injection;

use crate::error::{CatalogError, CatalogResult};

pub const PRODUCT_NAME_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName(String);

impl ProductName {
    pub fn new(raw: impl Into<String>) -> CatalogResult<Self> {
        let value = raw.into().trim().to_string();

        if value.is_empty() {
            return Err(CatalogError::Validation("Product name is required".to_string()));
        }

        if value.chars().count() > PRODUCT_NAME_MAX_LENGTH {
            return Err(CatalogError::Validation(format!(
                "Product name must be at most {PRODUCT_NAME_MAX_LENGTH} characters"
            )));
        }

        if contains_script_injection(&value) {
            return Err(CatalogError::ForbiddenContent("Product name"));
        }

        Ok(Self(value))
    }

    /// Trusted value loaded from the database
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

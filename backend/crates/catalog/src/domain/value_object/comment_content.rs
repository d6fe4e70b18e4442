//! Comment Content Value Object
//!
//! Whitespace runs collapse to one space. Markup that could execute in a
//! browser is refused, not escaped.

use std::fmt;

use platform::sanitize::{contains_script_injection, normalize_whitespace};

use crate::error::{CatalogError, CatalogResult};

pub const COMMENT_MAX_LENGTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    pub fn new(raw: impl Into<String>) -> CatalogResult<Self> {
        let value = normalize_whitespace(&raw.into());
        let len = value.chars().count();

        if len == 0 {
            return Err(CatalogError::Validation("Comment content is required".to_string()));
        }

        if len > COMMENT_MAX_LENGTH {
            return Err(CatalogError::Validation(format!(
                "Comment must be between 1 and {COMMENT_MAX_LENGTH} characters"
            )));
        }

        if contains_script_injection(&value) {
            return Err(CatalogError::ForbiddenContent("Comment"));
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

impl fmt::Display for CommentContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

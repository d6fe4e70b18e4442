//! Price Value Object

use std::fmt;

use crate::error::{CatalogError, CatalogResult};

/// Finite, strictly positive amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> CatalogResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CatalogError::Validation(
                "Price must be greater than zero".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Absent prices are rejected like non-positive ones
    pub fn required(value: Option<f64>) -> CatalogResult<Self> {
        value
            .ok_or_else(|| CatalogError::Validation("Price is required".to_string()))
            .and_then(Self::new)
    }

    pub fn from_db(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

//! Amount and Currency

use std::fmt;

use crate::error::{PaymentError, PaymentResult};

pub const DEFAULT_CURRENCY: &str = "COP";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: Option<f64>) -> PaymentResult<Self> {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => Ok(Self(v)),
            Some(_) => Err(PaymentError::Validation(
                "Amount must be greater than zero".to_string(),
            )),
            None => Err(PaymentError::Validation("Amount is required".to_string())),
        }
    }

    pub fn from_db(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// ISO 4217 style code: three upper-case ASCII letters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency(String);

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl Currency {
    /// Absent or blank input falls back to COP
    pub fn parse_or_default(raw: Option<&str>) -> PaymentResult<Self> {
        match raw.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(Self::default()),
            Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) => {
                Ok(Self(code.to_string()))
            }
            Some(_) => Err(PaymentError::Validation(
                "Currency must be three upper-case letters".to_string(),
            )),
        }
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Card Value Objects
//!
//! The full card number never leaves this module: callers receive only the
//! BIN (first six digits) and the last four digits.

use std::fmt;

use platform::sanitize::contains_script_injection;

use crate::error::{PaymentError, PaymentResult};

pub const DEFAULT_BIN: &str = "000000";
pub const DEFAULT_LAST4: &str = "0000";
pub const CARDHOLDER_MAX_LENGTH: usize = 255;

/// Masked card number
#[derive(Clone, PartialEq, Eq)]
pub struct CardMask {
    bin: String,
    last4: String,
}

impl CardMask {
    /// BIN and last four, with zero placeholders for short or absent numbers
    pub fn from_card_number(number: Option<&str>) -> Self {
        let digits = number.map(strip_separators).unwrap_or_default();
        let chars: Vec<char> = digits.chars().collect();

        let bin = if chars.len() >= 6 {
            chars[..6].iter().collect()
        } else {
            DEFAULT_BIN.to_string()
        };
        let last4 = if chars.len() >= 4 {
            chars[chars.len() - 4..].iter().collect()
        } else {
            DEFAULT_LAST4.to_string()
        };

        Self { bin, last4 }
    }

    /// Mask only when the number has at least six characters
    pub fn from_full_number(number: Option<&str>) -> Option<Self> {
        number
            .map(strip_separators)
            .filter(|digits| digits.chars().count() >= 6)
            .map(|digits| Self::from_card_number(Some(&digits)))
    }

    pub fn from_db(bin: String, last4: String) -> Self {
        Self { bin, last4 }
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }

    pub fn last4(&self) -> &str {
        &self.last4
    }
}

impl fmt::Debug for CardMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardMask({}******{})", self.bin, self.last4)
    }
}

fn strip_separators(number: &str) -> String {
    number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Name printed on the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cardholder(String);

impl Cardholder {
    /// Blank input means "not given"
    pub fn optional(raw: Option<&str>) -> PaymentResult<Option<Self>> {
        let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        if value.chars().count() > CARDHOLDER_MAX_LENGTH {
            return Err(PaymentError::Validation(format!(
                "Cardholder name must be at most {CARDHOLDER_MAX_LENGTH} characters"
            )));
        }
        if contains_script_injection(value) {
            return Err(PaymentError::Validation(
                "Cardholder name contains forbidden content".to_string(),
            ));
        }

        Ok(Some(Self(value.to_string())))
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Expiry month or year as typed (`"07"`, `"2027"`)
pub fn expiry_part(raw: Option<&str>, field: &str) -> PaymentResult<Option<String>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) if value.len() <= 4 && value.chars().all(|c| c.is_ascii_digit()) => {
            Ok(Some(value.to_string()))
        }
        Some(_) => Err(PaymentError::Validation(format!("Invalid {field}"))),
    }
}

//! Common ID Types
//!
//! Type-safe wrappers around database identities (`BIGSERIAL`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// Raised when a raw value cannot be an identity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier must be positive, got {0}")]
    NotPositive(i64),
    #[error("identifier is not a number: {0}")]
    NotANumber(String),
}

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type ProductId = Id<markers::Product>;
///
/// let id = ProductId::new(42).unwrap();
/// assert_eq!(id.value(), 42);
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Validate a raw identity (must be > 0)
    pub fn new(value: i64) -> Result<Self, IdError> {
        if value <= 0 {
            return Err(IdError::NotPositive(value));
        }
        Ok(Self::from_db(value))
    }

    /// Create from a database column (assumed valid)
    pub fn from_db(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

// Manual impls: derives would require `T: Clone` etc. on the marker.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> std::hash::Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| IdError::NotANumber(s.to_string()))?;
        Self::new(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    pub struct Product;
    pub struct Comment;
    pub struct ClientData;
    pub struct Payment;
}

pub type ProductId = Id<markers::Product>;
pub type CommentId = Id<markers::Comment>;
pub type ClientDataId = Id<markers::ClientData>;
pub type PaymentId = Id<markers::Payment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        assert_eq!(ProductId::new(0), Err(IdError::NotPositive(0)));
        assert_eq!(ProductId::new(-3), Err(IdError::NotPositive(-3)));
        assert_eq!(ProductId::new(9).unwrap().value(), 9);
    }

    #[test]
    fn test_parse_from_path_segment() {
        let id: CommentId = "15".parse().unwrap();
        assert_eq!(id.value(), 15);
        assert!(matches!("abc".parse::<CommentId>(), Err(IdError::NotANumber(_))));
    }

    #[test]
    fn test_serde_as_plain_number() {
        let id = PaymentId::new(77).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "77");
        let back: PaymentId = serde_json::from_str("77").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<PaymentId>("0").is_err());
    }
}

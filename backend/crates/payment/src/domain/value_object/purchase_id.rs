//! Purchase ID Value Object
//!
//! Six-digit number printed on receipts.

use std::fmt;
use std::ops::Range;

use rand::Rng;

pub const PURCHASE_ID_RANGE: Range<i32> = 100_000..999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PurchaseId(i32);

impl PurchaseId {
    pub fn random() -> Self {
        Self(rand::rng().random_range(PURCHASE_ID_RANGE))
    }

    pub fn from_db(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

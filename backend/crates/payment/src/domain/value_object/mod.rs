//! Value Objects

pub mod card;
pub mod money;
pub mod purchase_id;
pub mod status;

pub use card::{CardMask, Cardholder, expiry_part};
pub use money::{Amount, Currency, DEFAULT_CURRENCY};
pub use purchase_id::PurchaseId;
pub use status::PaymentStatus;

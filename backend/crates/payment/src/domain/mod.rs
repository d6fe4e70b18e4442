//! Domain Layer

pub mod payment;
pub mod repository;
pub mod value_object;

// Re-exports
pub use payment::{NewPayment, Payment};
pub use repository::PaymentRepository;
pub use value_object::*;

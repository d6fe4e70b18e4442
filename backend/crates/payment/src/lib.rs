//! Payment Backend Module
//!
//! Records card authorizations with a masked card number, and consumes the
//! client's discount coupon when one was applied at checkout.
//!
//! Clean Architecture structure:
//! - `domain/` - Payment entity, card masking, repository trait
//! - `application/` - Process, save and query use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use infra::postgres::PgPaymentRepository;
pub use presentation::router::payment_router;

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::payment::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::postgres::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

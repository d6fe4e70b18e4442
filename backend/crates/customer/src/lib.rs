//! Customer Backend Module
//!
//! Per-client profile data keyed by the identity provider's subject.
//!
//! Clean Architecture structure:
//! - `domain/` - Client data entity, value objects, repository trait
//! - `application/` - Use cases (also used by the payment crate for coupons)
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
pub use error::{CustomerError, CustomerResult};
pub use infra::postgres::PgClientDataRepository;
pub use presentation::router::customer_router;

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::client_data::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::infra::postgres::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

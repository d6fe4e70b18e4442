//! Catalog Backend Module
//!
//! Products, their images and shopper comments.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Admin-only product creation from JSON or `multipart/form-data`
//! - Uploaded images checked for type and size, then virus-scanned
//! - Comments screened for script content; authors may delete their own
//! - Public debug endpoints describing stored images

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{CatalogError, CatalogResult};
pub use infra::postgres::PgCatalogRepository;
pub use presentation::router::{catalog_router, debug_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

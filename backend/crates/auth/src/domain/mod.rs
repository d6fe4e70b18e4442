//! Domain Layer
//!
//! Contains the principal, authority mapping, registration value objects
//! and the identity provider ports.

pub mod authority;
pub mod principal;
pub mod registration;
pub mod repository;

// Re-exports
pub use principal::Principal;
pub use repository::{IdentityProvider, TokenVerifier};

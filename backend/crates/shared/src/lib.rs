//! Shared Kernel - Cross-domain vocabulary for the storefront backend
//!
//! This crate holds the few things every domain crate agrees on:
//! - The unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Typed database identities ([`id::Id`])
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across catalog, customer, payment and auth.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

//! Infrastructure Layer
//!
//! Database implementations of the repositories.

pub mod postgres;

pub use postgres::PgCatalogRepository;

//! Domain Layer

pub mod client_data;
pub mod repository;
pub mod value_object;

// Re-exports
pub use client_data::{ClientData, NewClientData};
pub use repository::ClientDataRepository;
pub use value_object::{ContactEmail, Uid};

//! Value Objects

pub mod contact_email;
pub mod uid;

pub use contact_email::ContactEmail;
pub use uid::Uid;

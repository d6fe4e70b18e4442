//! Application Layer
//!
//! Use cases for client profile data.

pub mod client_image;
pub mod coupon;
pub mod get_or_create;
pub mod save_client_data;
pub mod update_image;

// Re-exports
pub use client_image::ClientImageUseCase;
pub use coupon::SetCouponUseCase;
pub use get_or_create::{GetOrCreateClientUseCase, GetOrCreateOutput};
pub use save_client_data::{SaveClientDataInput, SaveClientDataUseCase};
pub use update_image::{IMAGE_UPDATED_MESSAGE, UpdateClientImageUseCase};

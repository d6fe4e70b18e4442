//! Application Layer
//!
//! Use cases for the product catalog.

pub mod add_comment;
pub mod create_product;
pub mod delete_comment;
pub mod delete_product;
pub mod query_products;

// Re-exports
pub use add_comment::AddCommentUseCase;
pub use create_product::{CreateProductInput, CreateProductUseCase};
pub use delete_comment::DeleteCommentUseCase;
pub use delete_product::DeleteProductUseCase;
pub use query_products::{ProductQueryUseCase, ProductWithComments};

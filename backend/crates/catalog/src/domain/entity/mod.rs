//! Domain Entities

pub mod comment;
pub mod product;

pub use comment::{Comment, NewComment};
pub use product::{ImageMeta, NewProduct, Product, ProductFilter, ProductImage};

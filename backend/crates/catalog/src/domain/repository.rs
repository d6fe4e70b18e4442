//! Repository Traits
//!
//! Interfaces for catalog persistence. Implementations are in the
//! infrastructure layer.

use kernel::id::{CommentId, ProductId};

use crate::domain::entity::{Comment, NewComment, NewProduct, Product, ProductFilter, ProductImage};
use crate::error::CatalogResult;

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// Insert a product and return it with its identity
    async fn create(&self, product: &NewProduct) -> CatalogResult<Product>;

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// All products, newest first
    async fn find_all(&self) -> CatalogResult<Vec<Product>>;

    /// Products matching every set filter, newest first
    async fn search(&self, filter: &ProductFilter) -> CatalogResult<Vec<Product>>;

    /// Remove a product and its comments; `false` when it did not exist
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;

    async fn find_image(&self, id: ProductId) -> CatalogResult<Option<ProductImage>>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create(&self, comment: &NewComment) -> CatalogResult<Comment>;

    async fn find_by_id(&self, id: CommentId) -> CatalogResult<Option<Comment>>;

    /// Comments of the given products, newest first
    async fn find_by_product_ids(&self, ids: &[ProductId]) -> CatalogResult<Vec<Comment>>;

    async fn delete(&self, id: CommentId) -> CatalogResult<bool>;
}

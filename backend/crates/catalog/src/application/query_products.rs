//! Product Queries
//!
//! Read-side use cases: listing, lookup, search, image download and the
//! debug view.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::ProductId;

use crate::domain::entity::{Comment, Product, ProductFilter, ProductImage};
use crate::domain::repository::{CommentRepository, ProductRepository};
use crate::error::{CatalogError, CatalogResult};

/// A product together with its comments, newest first
#[derive(Debug, Clone)]
pub struct ProductWithComments {
    pub product: Product,
    pub comments: Vec<Comment>,
}

pub struct ProductQueryUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    products: Arc<P>,
    comments: Arc<C>,
}

impl<P, C> ProductQueryUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    pub fn new(products: Arc<P>, comments: Arc<C>) -> Self {
        Self { products, comments }
    }

    /// Every product, newest first
    pub async fn list(&self) -> CatalogResult<Vec<ProductWithComments>> {
        let products = self.products.find_all().await?;
        self.attach_comments(products).await
    }

    pub async fn search(&self, filter: ProductFilter) -> CatalogResult<Vec<ProductWithComments>> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(CatalogError::Validation(
                    "minPrice must not exceed maxPrice".to_string(),
                ));
            }
        }

        let products = self.products.search(&filter).await?;
        tracing::debug!(?filter, results = products.len(), "Product search");
        self.attach_comments(products).await
    }

    pub async fn get(&self, id: ProductId) -> CatalogResult<ProductWithComments> {
        let product = self.find(id).await?;
        let mut found = self.attach_comments(vec![product]).await?;
        found.pop().ok_or(CatalogError::ProductNotFound)
    }

    /// Bare product without comments
    pub async fn find(&self, id: ProductId) -> CatalogResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    pub async fn image(&self, id: ProductId) -> CatalogResult<ProductImage> {
        match self.products.find_image(id).await? {
            Some(image) if !image.data.is_empty() => Ok(image),
            Some(_) => Err(CatalogError::ImageNotFound),
            None => {
                // Distinguish a missing product from a product without image.
                self.find(id).await?;
                Err(CatalogError::ImageNotFound)
            }
        }
    }

    /// Every product without comments, for the debug endpoints
    pub async fn list_bare(&self) -> CatalogResult<Vec<Product>> {
        self.products.find_all().await
    }

    async fn attach_comments(&self, products: Vec<Product>) -> CatalogResult<Vec<ProductWithComments>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
        let mut by_product: HashMap<ProductId, Vec<Comment>> = HashMap::new();
        for comment in self.comments.find_by_product_ids(&ids).await? {
            by_product.entry(comment.product_id).or_default().push(comment);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let mut comments = by_product.remove(&product.id).unwrap_or_default();
                comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
                ProductWithComments { product, comments }
            })
            .collect())
    }
}

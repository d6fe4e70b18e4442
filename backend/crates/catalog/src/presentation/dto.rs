//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, ProductId};
use serde::{Deserialize, Serialize};

use crate::application::ProductWithComments;
use crate::domain::entity::{Comment, Product, ProductFilter};

// ============================================================================
// Products
// ============================================================================

/// JSON body of `POST /api/products`
///
/// Every field is optional here so that missing values surface as
/// validation messages instead of deserialization errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub comments: Vec<CommentDto>,
    pub created_at: DateTime<Utc>,
    pub has_image: bool,
    pub image_type: Option<String>,
}

impl ProductDto {
    pub fn new(product: Product, comments: Vec<Comment>) -> Self {
        Self {
            id: product.id,
            has_image: product.has_image(),
            image_type: product.image_type().map(str::to_string),
            name: product.name.into_inner(),
            description: product.description.as_str().to_string(),
            price: product.price.value(),
            comments: comments.into_iter().map(CommentDto::from).collect(),
            created_at: product.created_at,
        }
    }
}

impl From<ProductWithComments> for ProductDto {
    fn from(found: ProductWithComments) -> Self {
        Self::new(found.product, found.comments)
    }
}

/// Query string of `GET /api/products/search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl From<SearchQuery> for ProductFilter {
    fn from(query: SearchQuery) -> Self {
        Self {
            name: query
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: CommentId,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content.as_str().to_string(),
            author: comment.author,
            created_at: comment.created_at,
        }
    }
}

// ============================================================================
// Debug
// ============================================================================

/// Image diagnostics exposed under `/api/test`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDebugDto {
    pub id: ProductId,
    pub name: String,
    pub image_name: Option<String>,
    pub image_type: Option<String>,
    pub has_image_data: bool,
    pub image_data_length: usize,
}

impl From<&Product> for ProductDebugDto {
    fn from(product: &Product) -> Self {
        let image = product.image.as_ref();
        Self {
            id: product.id,
            name: product.name.as_str().to_string(),
            image_name: image.and_then(|img| img.file_name.clone()),
            image_type: image.map(|img| img.content_type.clone()),
            has_image_data: product.has_image(),
            image_data_length: image.map_or(0, |img| img.size),
        }
    }
}

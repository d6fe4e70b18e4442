//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, ProductId};
use sqlx::PgPool;

use crate::domain::entity::{
    Comment, ImageMeta, NewComment, NewProduct, Product, ProductFilter, ProductImage,
};
use crate::domain::repository::{CommentRepository, ProductRepository};
use crate::domain::value_object::{CommentContent, Description, Price, ProductName};
use crate::error::CatalogResult;

const PRODUCT_COLUMNS: &str = r#"
    id,
    name,
    description,
    price,
    image_name,
    image_type,
    octet_length(image_data) AS image_size,
    created_at
"#;

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Product Repository Implementation
// ============================================================================

impl ProductRepository for PgCatalogRepository {
    async fn create(&self, product: &NewProduct) -> CatalogResult<Product> {
        let image = product.image.as_ref();

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, description, price, image_data, image_name, image_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.name.as_str())
        .bind(product.description.as_str())
        .bind(product.price.value())
        .bind(image.map(|img| img.data.as_slice()))
        .bind(image.and_then(|img| img.file_name.as_deref()))
        .bind(image.map(|img| img.content_type.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_product())
    }

    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn find_all(&self) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn search(&self, filter: &ProductFilter) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::float8 IS NULL OR price >= $2)
              AND ($3::float8 IS NULL OR price <= $3)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(filter.name.as_deref().map(like_pattern))
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn find_image(&self, id: ProductId) -> CatalogResult<Option<ProductImage>> {
        let row = sqlx::query_as::<_, ImageRow>(
            r#"
            SELECT image_data, image_name, image_type
            FROM products
            WHERE id = $1 AND image_data IS NOT NULL
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ImageRow::into_image))
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgCatalogRepository {
    async fn create(&self, comment: &NewComment) -> CatalogResult<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (product_id, content, author)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, content, author, created_at
            "#,
        )
        .bind(comment.product_id.value())
        .bind(comment.content.as_str())
        .bind(&comment.author)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_comment())
    }

    async fn find_by_id(&self, id: CommentId) -> CatalogResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, product_id, content, author, created_at FROM comments WHERE id = $1",
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn find_by_product_ids(&self, ids: &[ProductId]) -> CatalogResult<Vec<Comment>> {
        let ids: Vec<i64> = ids.iter().map(|id| id.value()).collect();

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, product_id, content, author, created_at
            FROM comments
            WHERE product_id = ANY($1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn delete(&self, id: CommentId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

/// `ILIKE` pattern for a literal substring
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    image_name: Option<String>,
    image_type: Option<String>,
    image_size: Option<i32>,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        let image = self.image_size.map(|size| ImageMeta {
            file_name: self.image_name,
            content_type: self.image_type.unwrap_or_default(),
            size: usize::try_from(size).unwrap_or_default(),
        });

        Product {
            id: ProductId::from_db(self.id),
            name: ProductName::from_db(self.name),
            description: Description::from_db(self.description),
            price: Price::from_db(self.price),
            image,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    image_data: Vec<u8>,
    image_name: Option<String>,
    image_type: Option<String>,
}

impl ImageRow {
    fn into_image(self) -> ProductImage {
        ProductImage {
            data: self.image_data,
            file_name: self.image_name,
            content_type: self
                .image_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    product_id: i64,
    content: String,
    author: String,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: CommentId::from_db(self.id),
            product_id: ProductId::from_db(self.product_id),
            content: CommentContent::from_db(self.content),
            author: self.author,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("lap"), "%lap%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}

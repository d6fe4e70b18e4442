//! Add Comment Use Case

use std::sync::Arc;

use auth::Principal;
use kernel::id::ProductId;

use crate::domain::entity::{Comment, NewComment};
use crate::domain::repository::{CommentRepository, ProductRepository};
use crate::domain::value_object::CommentContent;
use crate::error::{CatalogError, CatalogResult};

pub struct AddCommentUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    products: Arc<P>,
    comments: Arc<C>,
}

impl<P, C> AddCommentUseCase<P, C>
where
    P: ProductRepository,
    C: CommentRepository,
{
    pub fn new(products: Arc<P>, comments: Arc<C>) -> Self {
        Self { products, comments }
    }

    pub async fn execute(
        &self,
        author: &Principal,
        product_id: ProductId,
        content: String,
    ) -> CatalogResult<Comment> {
        let content = CommentContent::new(content)?;

        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }

        let comment = self
            .comments
            .create(&NewComment {
                product_id,
                content,
                author: author.display_name().to_string(),
            })
            .await?;

        tracing::info!(
            product_id = %product_id,
            comment_id = %comment.id,
            author = %comment.author,
            "Comment added"
        );

        Ok(comment)
    }
}

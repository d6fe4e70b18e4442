//! Delete Comment Use Case

use std::sync::Arc;

use auth::Principal;
use kernel::id::CommentId;

use crate::domain::repository::CommentRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct DeleteCommentUseCase<C>
where
    C: CommentRepository,
{
    comments: Arc<C>,
}

impl<C> DeleteCommentUseCase<C>
where
    C: CommentRepository,
{
    pub fn new(comments: Arc<C>) -> Self {
        Self { comments }
    }

    /// Only the author or an admin may delete a comment
    pub async fn execute(&self, caller: &Principal, id: CommentId) -> CatalogResult<()> {
        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CommentNotFound)?;

        if !comment.is_authored_by(caller.display_name()) && !caller.is_admin() {
            return Err(CatalogError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }

        if !self.comments.delete(id).await? {
            return Err(CatalogError::CommentNotFound);
        }

        tracing::info!(comment_id = %id, deleted_by = %caller.display_name(), "Comment deleted");
        Ok(())
    }
}

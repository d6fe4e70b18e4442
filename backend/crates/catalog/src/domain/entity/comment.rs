//! Comment Entity

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, ProductId};

use crate::domain::value_object::CommentContent;

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: CommentId,
    pub product_id: ProductId,
    pub content: CommentContent,
    /// Display name of the caller who wrote it
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Authors may remove their own comments
    pub fn is_authored_by(&self, name: &str) -> bool {
        self.author == name
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub product_id: ProductId,
    pub content: CommentContent,
    pub author: String,
}

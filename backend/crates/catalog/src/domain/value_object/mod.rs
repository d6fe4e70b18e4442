//! Value Objects

pub mod comment_content;
pub mod description;
pub mod price;
pub mod product_name;

pub use comment_content::CommentContent;
pub use description::Description;
pub use price::Price;
pub use product_name::ProductName;

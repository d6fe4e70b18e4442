//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod access;
pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use access::PublicPaths;
pub use extractor::CurrentUser;
pub use handlers::AuthAppState;
pub use middleware::{JwtAuthState, bearer_token, require_jwt};
pub use router::{auth_router, auth_router_generic};

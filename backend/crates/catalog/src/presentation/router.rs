//! Catalog Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;

use platform::clamav::{ClamdClient, VirusScanner};
use platform::image::ImageValidator;

use crate::domain::repository::{CommentRepository, ProductRepository};
use crate::infra::postgres::PgCatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Multipart framing and text fields on top of the image itself
pub const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the product router (`/api/products`) with PostgreSQL storage
pub fn catalog_router(repo: PgCatalogRepository, images: ImageValidator<ClamdClient>) -> Router {
    catalog_router_generic(repo, images)
}

/// Create a generic product router for any repository and scanner
pub fn catalog_router_generic<R, S>(repo: R, images: ImageValidator<S>) -> Router
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let body_limit = images.max_bytes() + FORM_OVERHEAD_BYTES;
    let state = CatalogAppState {
        repo: Arc::new(repo),
        images,
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_products::<R, S>).post(handlers::create_product::<R, S>),
        )
        .route("/search", get(handlers::search_products::<R, S>))
        .route(
            "/{id}",
            get(handlers::get_product::<R, S>).delete(handlers::delete_product::<R, S>),
        )
        .route("/{id}/image", get(handlers::get_product_image::<R, S>))
        .route("/{id}/comments", post(handlers::add_comment::<R, S>))
        .route(
            "/comments/{comment_id}",
            delete(handlers::delete_comment::<R, S>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Public image diagnostics (`/api/test`)
pub fn debug_router(repo: PgCatalogRepository) -> Router {
    debug_router_generic(repo)
}

pub fn debug_router_generic<R>(repo: R) -> Router
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/all", get(handlers::debug_all::<R>))
        .route("/{id}", get(handlers::debug_product::<R>))
        .with_state(Arc::new(repo))
}

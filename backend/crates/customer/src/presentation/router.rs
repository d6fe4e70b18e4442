//! Client Data Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use std::sync::Arc;

use platform::clamav::{ClamdClient, VirusScanner};
use platform::image::ImageValidator;

use crate::domain::repository::ClientDataRepository;
use crate::infra::postgres::PgClientDataRepository;
use crate::presentation::handlers::{self, CustomerAppState};

/// Multipart framing and text fields on top of the image itself
pub const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the client data router (`/api/client-data`) with PostgreSQL storage
pub fn customer_router(repo: PgClientDataRepository, images: ImageValidator<ClamdClient>) -> Router {
    customer_router_generic(repo, images)
}

/// Create a generic client data router for any repository and scanner
pub fn customer_router_generic<R, S>(repo: R, images: ImageValidator<S>) -> Router
where
    R: ClientDataRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let body_limit = images.max_bytes() + FORM_OVERHEAD_BYTES;
    let state = CustomerAppState {
        repo: Arc::new(repo),
        images,
    };

    Router::new()
        .route("/", post(handlers::save::<R, S>))
        .route("/{uid}", get(handlers::get_or_create::<R, S>))
        .route("/{uid}/toggle-coupon", put(handlers::toggle_coupon::<R, S>))
        .route(
            "/{uid}/image",
            get(handlers::get_image::<R, S>).put(handlers::update_image::<R, S>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

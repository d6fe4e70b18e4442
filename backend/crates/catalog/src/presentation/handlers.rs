//! HTTP Handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use auth::CurrentUser;
use auth::models::ADMIN_ROLE;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::id::{CommentId, ProductId};
use platform::clamav::VirusScanner;
use platform::image::ImageValidator;
use platform::multipart::{MultipartError, MultipartForm};

use crate::application::{
    AddCommentUseCase, CreateProductInput, CreateProductUseCase, DeleteCommentUseCase,
    DeleteProductUseCase, ProductQueryUseCase,
};
use crate::domain::repository::{CommentRepository, ProductRepository};
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{
    AddCommentRequest, CommentDto, CreateProductRequest, ProductDebugDto, ProductDto, SearchQuery,
};

/// Multipart part holding the product image
pub const IMAGE_FIELD: &str = "image";

/// Shared state for catalog handlers
pub struct CatalogAppState<R, S>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub images: ImageValidator<S>,
}

impl<R, S> Clone for CatalogAppState<R, S>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            images: self.images.clone(),
        }
    }
}

impl<R, S> CatalogAppState<R, S>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    fn queries(&self) -> ProductQueryUseCase<R, R> {
        ProductQueryUseCase::new(self.repo.clone(), self.repo.clone())
    }
}

/// Path ids that are not positive integers cannot name a product
fn product_id(raw: &str) -> CatalogResult<ProductId> {
    raw.parse().map_err(|_| CatalogError::ProductNotFound)
}

fn comment_id(raw: &str) -> CatalogResult<CommentId> {
    raw.parse().map_err(|_| CatalogError::CommentNotFound)
}

// ============================================================================
// Products
// ============================================================================

/// POST /api/products
///
/// Accepts either a JSON body or `multipart/form-data` with an optional
/// `image` part.
pub async fn create_product<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    user: CurrentUser,
    req: Request,
) -> CatalogResult<Json<ProductDto>>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    user.require_role(ADMIN_ROLE)?;

    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));

    let input = if is_multipart {
        read_multipart_product(req).await?
    } else {
        read_json_product(req).await?
    };

    let use_case = CreateProductUseCase::new(state.repo.clone(), state.images.clone());
    let product = use_case.execute(input).await?;

    Ok(Json(ProductDto::new(product, Vec::new())))
}

async fn read_json_product(req: Request) -> CatalogResult<CreateProductInput> {
    let body = Bytes::from_request(req, &()).await.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            CatalogError::BodyTooLarge
        } else {
            CatalogError::Validation(rejection.body_text())
        }
    })?;

    let request: CreateProductRequest = serde_json::from_slice(&body)
        .map_err(|e| CatalogError::Validation(format!("Invalid product payload: {e}")))?;

    Ok(CreateProductInput {
        name: request.name,
        description: request.description,
        price: request.price,
        image: None,
    })
}

async fn read_multipart_product(req: Request) -> CatalogResult<CreateProductInput> {
    let multipart = Multipart::from_request(req, &())
        .await
        .map_err(|rejection| MultipartError::Malformed(rejection.body_text()))?;

    let mut form = MultipartForm::read(multipart, &[IMAGE_FIELD]).await?;

    Ok(CreateProductInput {
        name: form.text("name").unwrap_or_default().to_string(),
        description: form.text("description").unwrap_or_default().to_string(),
        price: form.parse("price")?,
        image: form.take_file(IMAGE_FIELD),
    })
}

/// GET /api/products
pub async fn list_products<R, S>(
    State(state): State<CatalogAppState<R, S>>,
) -> CatalogResult<Json<Vec<ProductDto>>>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let products = state.queries().list().await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// GET /api/products/search
pub async fn search_products<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    Query(query): Query<SearchQuery>,
) -> CatalogResult<Json<Vec<ProductDto>>>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let products = state.queries().search(query.into()).await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// GET /api/products/{id}
pub async fn get_product<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<ProductDto>>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let found = state.queries().get(product_id(&id)?).await?;
    Ok(Json(found.into()))
}

/// GET /api/products/{id}/image
pub async fn get_product_image<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    Path(id): Path<String>,
) -> CatalogResult<Response>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let image = state.queries().image(product_id(&id)?).await?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], image.data).into_response())
}

/// DELETE /api/products/{id}
pub async fn delete_product<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<StatusCode>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    user.require_role(ADMIN_ROLE)?;

    let use_case = DeleteProductUseCase::new(state.repo.clone());
    use_case.execute(product_id(&id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Comments
// ============================================================================

/// POST /api/products/{id}/comments
pub async fn add_comment<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> CatalogResult<Json<CommentDto>>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let use_case = AddCommentUseCase::new(state.repo.clone(), state.repo.clone());
    let comment = use_case
        .execute(&principal, product_id(&id)?, req.content)
        .await?;

    Ok(Json(comment.into()))
}

/// DELETE /api/products/comments/{comment_id}
pub async fn delete_comment<R, S>(
    State(state): State<CatalogAppState<R, S>>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> CatalogResult<StatusCode>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
    S: VirusScanner + Send + Sync + 'static,
{
    let use_case = DeleteCommentUseCase::new(state.repo.clone());
    use_case.execute(&principal, comment_id(&id)?).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Debug
// ============================================================================

/// GET /api/test/all
pub async fn debug_all<R>(State(repo): State<Arc<R>>) -> CatalogResult<Json<BTreeMap<String, ProductDebugDto>>>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
{
    let products = ProductQueryUseCase::new(repo.clone(), repo).list_bare().await?;
    Ok(Json(
        products
            .iter()
            .map(|p| (format!("product_{}", p.id), ProductDebugDto::from(p)))
            .collect(),
    ))
}

/// GET /api/test/{id}
pub async fn debug_product<R>(
    State(repo): State<Arc<R>>,
    Path(id): Path<String>,
) -> CatalogResult<Json<ProductDebugDto>>
where
    R: ProductRepository + CommentRepository + Send + Sync + 'static,
{
    let product = ProductQueryUseCase::new(repo.clone(), repo)
        .find(product_id(&id)?)
        .await?;
    Ok(Json(ProductDebugDto::from(&product)))
}

//! Catalog Error Types
//!
//! Catalog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::image::ImageRejection;
use platform::multipart::MultipartError;
use thiserror::Error;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Product has no image")]
    ImageNotFound,

    /// Field validation failed
    #[error("{0}")]
    Validation(String),

    /// Text contains executable markup
    #[error("{0} contains forbidden content")]
    ForbiddenContent(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Image(#[from] ImageRejection),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::ProductNotFound
            | CatalogError::CommentNotFound
            | CatalogError::ImageNotFound => ErrorKind::NotFound,
            CatalogError::Validation(_) | CatalogError::ForbiddenContent(_) => {
                ErrorKind::BadRequest
            }
            CatalogError::Forbidden(_) => ErrorKind::Forbidden,
            CatalogError::Image(rejection) => rejection.kind(),
            CatalogError::Multipart(err) => err.kind(),
            CatalogError::BodyTooLarge => ErrorKind::PayloadTooLarge,
            CatalogError::Database(_) | CatalogError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            CatalogError::Image(ImageRejection::ScanFailed(_)) => err.expose_message(),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            CatalogError::Image(ImageRejection::ScanFailed(detail)) => {
                tracing::error!(detail = %detail, "Image could not be scanned");
            }
            CatalogError::Image(ImageRejection::Infected(signature)) => {
                tracing::warn!(signature = %signature, "Rejected infected product image");
            }
            CatalogError::ForbiddenContent(field) => {
                tracing::warn!(field, "Rejected text with script content");
            }
            CatalogError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Catalog access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<auth::AuthError> for CatalogError {
    fn from(err: auth::AuthError) -> Self {
        match err {
            auth::AuthError::MissingRole(_) => CatalogError::Forbidden(err.to_string()),
            other => CatalogError::Internal(other.to_string()),
        }
    }
}

//! Customer Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::image::ImageRejection;
use platform::multipart::MultipartError;
use thiserror::Error;

pub type CustomerResult<T> = Result<T, CustomerError>;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Client not found")]
    ClientNotFound,

    #[error("Client has no image")]
    ImageNotFound,

    #[error("{0}")]
    Validation(String),

    /// Caller tried to modify another client's record
    #[error("Not allowed to modify this client")]
    NotOwner,

    #[error(transparent)]
    Image(#[from] ImageRejection),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CustomerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CustomerError::ClientNotFound | CustomerError::ImageNotFound => ErrorKind::NotFound,
            CustomerError::Validation(_) => ErrorKind::BadRequest,
            CustomerError::NotOwner => ErrorKind::Forbidden,
            CustomerError::Image(rejection) => rejection.kind(),
            CustomerError::Multipart(err) => err.kind(),
            CustomerError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            CustomerError::Image(ImageRejection::ScanFailed(_)) => err.expose_message(),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            CustomerError::Database(e) => {
                tracing::error!(error = %e, "Customer database error");
            }
            CustomerError::Image(ImageRejection::ScanFailed(detail)) => {
                tracing::error!(detail = %detail, "Profile image could not be scanned");
            }
            CustomerError::Image(ImageRejection::Infected(signature)) => {
                tracing::warn!(signature = %signature, "Rejected infected profile image");
            }
            CustomerError::NotOwner => {
                tracing::warn!("Attempt to modify another client's data");
            }
            _ => {
                tracing::debug!(error = %self, "Customer error");
            }
        }
    }
}

impl IntoResponse for CustomerError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

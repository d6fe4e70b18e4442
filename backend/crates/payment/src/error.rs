//! Payment Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use customer::CustomerError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    /// Every drawn purchase id was already taken
    #[error("Could not allocate a purchase id, try again")]
    PurchaseIdExhausted,

    #[error(transparent)]
    Client(#[from] CustomerError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::NotFound => ErrorKind::NotFound,
            PaymentError::Validation(_) => ErrorKind::BadRequest,
            PaymentError::Forbidden(_) => ErrorKind::Forbidden,
            PaymentError::PurchaseIdExhausted => ErrorKind::ServiceUnavailable,
            PaymentError::Client(err) => err.kind(),
            PaymentError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            PaymentError::PurchaseIdExhausted => err.expose_message(),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            PaymentError::Database(e) => {
                tracing::error!(error = %e, "Payment database error");
            }
            PaymentError::Client(e) => {
                tracing::error!(error = %e, "Client data lookup failed during payment");
            }
            PaymentError::PurchaseIdExhausted => {
                tracing::error!("Purchase id space exhausted");
            }
            PaymentError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Payment access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Payment error");
            }
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<auth::AuthError> for PaymentError {
    fn from(err: auth::AuthError) -> Self {
        PaymentError::Forbidden(err.to_string())
    }
}

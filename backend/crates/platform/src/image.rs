//! Image upload validation
//!
//! Every uploaded picture (product photos, client avatars) passes through
//! [`ImageValidator`] before it is stored. Checks run in a fixed order:
//! media type, then size, then the virus scan.

use std::sync::Arc;

use kernel::error::kind::ErrorKind;

use crate::clamav::{ScanVerdict, VirusScanner};

/// Media types accepted for uploaded images
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// 5 MiB
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image as received from a multipart field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Lower-cased media type without parameters (`image/PNG; q=1` → `image/png`)
    pub fn media_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .map(normalize_media_type)
            .filter(|s| !s.is_empty())
    }
}

pub fn normalize_media_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn is_allowed_image_type(media_type: &str) -> bool {
    let normalized = normalize_media_type(media_type);
    ALLOWED_IMAGE_TYPES.contains(&normalized.as_str())
}

/// Why an upload was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageRejection {
    #[error("Image type not allowed: {0}")]
    UnsupportedType(String),

    #[error("Image exceeds the maximum size of {limit} bytes ({size} bytes received)")]
    TooLarge { size: usize, limit: usize },

    #[error("Image contains malicious content: {0}")]
    Infected(String),

    #[error("Failed to process the image")]
    ScanFailed(String),
}

impl ImageRejection {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImageRejection::UnsupportedType(_) => ErrorKind::UnsupportedMediaType,
            ImageRejection::TooLarge { .. } => ErrorKind::PayloadTooLarge,
            ImageRejection::Infected(_) => ErrorKind::BadRequest,
            ImageRejection::ScanFailed(_) => ErrorKind::InternalServerError,
        }
    }
}

/// Media type + size + antivirus gate for uploads
pub struct ImageValidator<S> {
    scanner: Arc<S>,
    max_bytes: usize,
}

impl<S> Clone for ImageValidator<S> {
    fn clone(&self) -> Self {
        Self {
            scanner: Arc::clone(&self.scanner),
            max_bytes: self.max_bytes,
        }
    }
}

impl<S: VirusScanner> ImageValidator<S> {
    pub fn new(scanner: Arc<S>, max_bytes: usize) -> Self {
        Self { scanner, max_bytes }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate an uploaded image, returning its normalized media type
    pub async fn validate(&self, image: &UploadedImage) -> Result<String, ImageRejection> {
        let media_type = image.media_type().unwrap_or_default();
        if !ALLOWED_IMAGE_TYPES.contains(&media_type.as_str()) {
            let shown = image.content_type.clone().unwrap_or_else(|| "unknown".to_string());
            return Err(ImageRejection::UnsupportedType(shown));
        }

        if image.len() > self.max_bytes {
            return Err(ImageRejection::TooLarge {
                size: image.len(),
                limit: self.max_bytes,
            });
        }

        match self.scanner.scan(&image.bytes).await {
            Ok(ScanVerdict::Clean) => {
                tracing::debug!(
                    file_name = image.file_name.as_deref().unwrap_or("-"),
                    bytes = image.len(),
                    "image passed virus scan"
                );
                Ok(media_type)
            }
            Ok(ScanVerdict::Infected { signature }) => {
                tracing::warn!(
                    file_name = image.file_name.as_deref().unwrap_or("-"),
                    signature = %signature,
                    "infected upload rejected"
                );
                Err(ImageRejection::Infected(signature))
            }
            Ok(ScanVerdict::Error(detail)) => {
                tracing::error!(detail = %detail, "virus scanner reported an error");
                Err(ImageRejection::ScanFailed(detail))
            }
            Err(e) => {
                tracing::error!(error = %e, "virus scanner unreachable");
                Err(ImageRejection::ScanFailed(e.to_string()))
            }
        }
    }

    /// Same as [`validate`](Self::validate), but a missing or empty image is accepted
    pub async fn validate_optional(
        &self,
        image: Option<&UploadedImage>,
    ) -> Result<Option<String>, ImageRejection> {
        match image {
            Some(image) if !image.is_empty() => self.validate(image).await.map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clamav::ScanError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubScanner {
        verdict: Result<ScanVerdict, ()>,
        calls: AtomicUsize,
    }

    impl StubScanner {
        fn new(verdict: Result<ScanVerdict, ()>) -> Arc<Self> {
            Arc::new(Self {
                verdict,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl VirusScanner for StubScanner {
        async fn scan(&self, _data: &[u8]) -> Result<ScanVerdict, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verdict.clone().map_err(|_| {
                ScanError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "refused",
                ))
            })
        }
    }

    fn png(len: usize) -> UploadedImage {
        UploadedImage::new(
            Some("photo.png".to_string()),
            Some("image/png".to_string()),
            vec![0x89; len],
        )
    }

    #[test]
    fn test_media_type_normalization() {
        assert_eq!(normalize_media_type("Image/PNG; charset=binary"), "image/png");
        assert!(is_allowed_image_type("IMAGE/JPEG"));
        assert!(is_allowed_image_type("image/jpg"));
        assert!(!is_allowed_image_type("image/gif"));
        assert!(!is_allowed_image_type(""));
    }

    #[tokio::test]
    async fn test_clean_image_is_accepted() {
        let scanner = StubScanner::new(Ok(ScanVerdict::Clean));
        let validator = ImageValidator::new(scanner.clone(), DEFAULT_MAX_IMAGE_BYTES);

        assert_eq!(validator.validate(&png(100)).await.unwrap(), "image/png");
        assert_eq!(scanner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disallowed_type_is_rejected_before_scanning() {
        let scanner = StubScanner::new(Ok(ScanVerdict::Clean));
        let validator = ImageValidator::new(scanner.clone(), DEFAULT_MAX_IMAGE_BYTES);

        let mut image = png(10);
        image.content_type = Some("application/pdf".to_string());
        let err = validator.validate(&image).await.unwrap_err();

        assert_eq!(err, ImageRejection::UnsupportedType("application/pdf".to_string()));
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
        assert_eq!(err.to_string(), "Image type not allowed: application/pdf");
        assert_eq!(scanner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_rejected() {
        let validator =
            ImageValidator::new(StubScanner::new(Ok(ScanVerdict::Clean)), DEFAULT_MAX_IMAGE_BYTES);
        let mut image = png(10);
        image.content_type = None;

        let err = validator.validate(&image).await.unwrap_err();
        assert_eq!(err, ImageRejection::UnsupportedType("unknown".to_string()));
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected_before_scanning() {
        let scanner = StubScanner::new(Ok(ScanVerdict::Clean));
        let validator = ImageValidator::new(scanner.clone(), 64);

        assert!(validator.validate(&png(64)).await.is_ok());
        let err = validator.validate(&png(65)).await.unwrap_err();

        assert_eq!(err, ImageRejection::TooLarge { size: 65, limit: 64 });
        assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
        assert_eq!(scanner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_infected_image_is_rejected() {
        let validator = ImageValidator::new(
            StubScanner::new(Ok(ScanVerdict::Infected {
                signature: "Eicar-Test-Signature".to_string(),
            })),
            DEFAULT_MAX_IMAGE_BYTES,
        );

        let err = validator.validate(&png(10)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(
            err.to_string(),
            "Image contains malicious content: Eicar-Test-Signature"
        );
    }

    #[tokio::test]
    async fn test_scanner_failures_map_to_server_error() {
        let validator = ImageValidator::new(StubScanner::new(Err(())), DEFAULT_MAX_IMAGE_BYTES);
        let err = validator.validate(&png(10)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert_eq!(err.to_string(), "Failed to process the image");

        let validator = ImageValidator::new(
            StubScanner::new(Ok(ScanVerdict::Error("size limit".to_string()))),
            DEFAULT_MAX_IMAGE_BYTES,
        );
        assert!(matches!(
            validator.validate(&png(10)).await,
            Err(ImageRejection::ScanFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_absent_image_is_not_an_error() {
        let scanner = StubScanner::new(Ok(ScanVerdict::Clean));
        let validator = ImageValidator::new(scanner.clone(), DEFAULT_MAX_IMAGE_BYTES);

        assert_eq!(validator.validate_optional(None).await.unwrap(), None);
        assert_eq!(
            validator
                .validate_optional(Some(&UploadedImage::default()))
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            validator.validate_optional(Some(&png(3))).await.unwrap(),
            Some("image/png".to_string())
        );
        assert_eq!(scanner.calls.load(Ordering::SeqCst), 1);
    }
}

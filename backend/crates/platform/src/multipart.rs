//! `multipart/form-data` reader for upload endpoints
//!
//! Collects text fields and the declared file fields of a form into memory.
//! The request body is already capped by the router's body limit.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use axum::http::StatusCode;
use kernel::error::kind::ErrorKind;

use crate::image::UploadedImage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MultipartError {
    #[error("Malformed multipart request: {0}")]
    Malformed(String),

    #[error("Request body too large")]
    TooLarge,

    #[error("Invalid value for field '{field}'")]
    InvalidField { field: String },
}

impl MultipartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MultipartError::TooLarge => ErrorKind::PayloadTooLarge,
            MultipartError::Malformed(_) | MultipartError::InvalidField { .. } => {
                ErrorKind::BadRequest
            }
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for MultipartError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            MultipartError::TooLarge
        } else {
            MultipartError::Malformed(err.body_text())
        }
    }
}

/// A fully read multipart form
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedImage>,
}

impl MultipartForm {
    /// Read every part; parts named in `file_fields` are kept as raw uploads
    pub async fn read(mut multipart: Multipart, file_fields: &[&str]) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if file_fields.contains(&name.as_str()) {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                form.files
                    .insert(name, UploadedImage::new(file_name, content_type, bytes));
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Raw text of a field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Parse a trimmed, non-empty text field
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, MultipartError> {
        match self.text(name).map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| MultipartError::InvalidField {
                field: name.to_string(),
            }),
        }
    }

    /// Checkbox-style boolean (`true`/`false`, `on`, `1`/`0`); absent is `false`
    pub fn flag(&self, name: &str) -> Result<bool, MultipartError> {
        match self.text(name).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("false") | Some("off") | Some("0") => Ok(false),
            Some("true") | Some("on") | Some("1") => Ok(true),
            Some(_) => Err(MultipartError::InvalidField {
                field: name.to_string(),
            }),
        }
    }

    /// Remove and return an uploaded file; empty parts count as absent
    pub fn take_file(&mut self, name: &str) -> Option<UploadedImage> {
        self.files.remove(name).filter(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header};

    const BOUNDARY: &str = "X-TEST-BOUNDARY";

    fn body(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, file, data) in parts {
            out.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file {
                Some((file_name, content_type)) => {
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                }
                None => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                }
            }
            out.extend_from_slice(data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        out
    }

    async fn form(parts: &[(&str, Option<(&str, &str)>, &[u8])], files: &[&str]) -> MultipartForm {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body(parts)))
            .unwrap();
        let multipart = Multipart::from_request(request, &()).await.unwrap();
        MultipartForm::read(multipart, files).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_text_and_file_fields() {
        let mut form = form(
            &[
                ("name", None, b"Phone"),
                ("price", None, b" 199.5 "),
                ("image", Some(("phone.png", "image/png")), b"\x89PNG...."),
            ],
            &["image"],
        )
        .await;

        assert_eq!(form.text("name"), Some("Phone"));
        assert_eq!(form.parse::<f64>("price").unwrap(), Some(199.5));
        assert_eq!(form.parse::<f64>("missing").unwrap(), None);

        let image = form.take_file("image").unwrap();
        assert_eq!(image.file_name.as_deref(), Some("phone.png"));
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(image.bytes, b"\x89PNG....".to_vec());
        assert!(form.take_file("image").is_none());
    }

    #[tokio::test]
    async fn test_empty_file_part_counts_as_absent() {
        let mut form = form(
            &[("imagen", Some(("", "application/octet-stream")), b"")],
            &["imagen"],
        )
        .await;
        assert!(form.take_file("imagen").is_none());
    }

    #[tokio::test]
    async fn test_invalid_number_and_flag() {
        let form = form(
            &[("price", None, b"abc"), ("usoCodigoDescuento", None, b"maybe")],
            &[],
        )
        .await;
        assert_eq!(
            form.parse::<f64>("price").unwrap_err(),
            MultipartError::InvalidField {
                field: "price".to_string()
            }
        );
        assert!(form.flag("usoCodigoDescuento").is_err());
        assert!(!form.flag("absent").unwrap());
    }

    #[tokio::test]
    async fn test_flag_values() {
        let form = form(
            &[("a", None, b"true"), ("b", None, b"FALSE"), ("c", None, b"on")],
            &[],
        )
        .await;
        assert!(form.flag("a").unwrap());
        assert!(!form.flag("b").unwrap());
        assert!(form.flag("c").unwrap());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(MultipartError::TooLarge.kind(), ErrorKind::PayloadTooLarge);
        assert_eq!(
            MultipartError::Malformed("x".to_string()).kind(),
            ErrorKind::BadRequest
        );
    }
}

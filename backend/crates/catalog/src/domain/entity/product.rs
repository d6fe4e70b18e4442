//! Product Entity

use chrono::{DateTime, Utc};
use kernel::id::ProductId;

use crate::domain::value_object::{Description, Price, ProductName};

/// Stored image metadata; the bytes are loaded separately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    pub file_name: Option<String>,
    pub content_type: String,
    pub size: usize,
}

/// Image bytes as stored with a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductImage {
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: String,
}

impl ProductImage {
    pub fn meta(&self) -> ImageMeta {
        ImageMeta {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size: self.data.len(),
        }
    }
}

/// Product entity
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: Description,
    pub price: Price,
    pub image: Option<ImageMeta>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|img| img.size > 0)
    }

    pub fn image_type(&self) -> Option<&str> {
        self.image.as_ref().map(|img| img.content_type.as_str())
    }
}

/// A product ready to be inserted
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Description,
    pub price: Price,
    pub image: Option<ProductImage>,
}

/// Search filters; every field is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProductFilter {
    pub fn matches(&self, name: &str, price: f64) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .is_none_or(|needle| name.to_lowercase().contains(&needle.to_lowercase()));
        let min_ok = self.min_price.is_none_or(|min| price >= min);
        let max_ok = self.max_price.is_none_or(|max| price <= max);
        name_ok && min_ok && max_ok
    }
}

//! Create Product Use Case

use std::sync::Arc;

use platform::clamav::VirusScanner;
use platform::image::{ImageValidator, UploadedImage};

use crate::domain::entity::{NewProduct, Product, ProductImage};
use crate::domain::repository::ProductRepository;
use crate::domain::value_object::{Description, Price, ProductName};
use crate::error::CatalogResult;

/// Create product input
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub image: Option<UploadedImage>,
}

/// Create product use case
pub struct CreateProductUseCase<R, S>
where
    R: ProductRepository,
    S: VirusScanner,
{
    repo: Arc<R>,
    images: ImageValidator<S>,
}

impl<R, S> CreateProductUseCase<R, S>
where
    R: ProductRepository,
    S: VirusScanner,
{
    pub fn new(repo: Arc<R>, images: ImageValidator<S>) -> Self {
        Self { repo, images }
    }

    /// Fields are validated before the image is sent to the scanner
    pub async fn execute(&self, input: CreateProductInput) -> CatalogResult<Product> {
        let name = ProductName::new(input.name)?;
        let description = Description::new(input.description)?;
        let price = Price::required(input.price)?;

        let image = match input.image {
            Some(upload) => self
                .images
                .validate_optional(Some(&upload))
                .await?
                .map(|content_type| ProductImage {
                    data: upload.bytes,
                    file_name: upload.file_name,
                    content_type,
                }),
            None => None,
        };

        let product = self
            .repo
            .create(&NewProduct {
                name,
                description,
                price,
                image,
            })
            .await?;

        tracing::info!(
            product_id = %product.id,
            name = %product.name,
            has_image = product.has_image(),
            "Product created"
        );

        Ok(product)
    }
}

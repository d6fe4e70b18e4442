//! Update Client Image Use Case

use std::sync::Arc;

use auth::Principal;
use platform::clamav::VirusScanner;
use platform::image::{ImageValidator, UploadedImage};

use crate::domain::repository::ClientDataRepository;
use crate::domain::value_object::Uid;
use crate::error::{CustomerError, CustomerResult};

pub const IMAGE_UPDATED_MESSAGE: &str = "Image updated";

pub struct UpdateClientImageUseCase<R, S>
where
    R: ClientDataRepository,
    S: VirusScanner,
{
    repo: Arc<R>,
    images: ImageValidator<S>,
}

impl<R, S> UpdateClientImageUseCase<R, S>
where
    R: ClientDataRepository,
    S: VirusScanner,
{
    pub fn new(repo: Arc<R>, images: ImageValidator<S>) -> Self {
        Self { repo, images }
    }

    /// Ownership is checked first, then existence, then the image itself
    pub async fn execute(
        &self,
        caller: &Principal,
        uid: String,
        image: Option<UploadedImage>,
    ) -> CustomerResult<()> {
        let uid = Uid::new(uid)?;
        if caller.subject != uid.as_str() {
            return Err(CustomerError::NotOwner);
        }

        if self.repo.find_by_uid(&uid).await?.is_none() {
            return Err(CustomerError::ClientNotFound);
        }

        let image = image
            .filter(|img| !img.is_empty())
            .ok_or_else(|| CustomerError::Validation("A valid image is required".to_string()))?;
        self.images.validate(&image).await?;

        if !self.repo.set_image(&uid, &image.bytes).await? {
            return Err(CustomerError::ClientNotFound);
        }

        tracing::info!(uid = %uid, bytes = image.len(), "Client image updated");
        Ok(())
    }
}

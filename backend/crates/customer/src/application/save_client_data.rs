//! Save Client Data Use Case
//!
//! Stores the caller's profile from the `multipart/form-data` form. The
//! record is keyed by the token subject, never by a client-supplied uid.

use std::sync::Arc;

use auth::Principal;
use platform::clamav::VirusScanner;
use platform::image::{ImageValidator, UploadedImage};

use crate::domain::client_data::{ClientData, NewClientData};
use crate::domain::repository::ClientDataRepository;
use crate::domain::value_object::{ContactEmail, Uid};
use crate::error::CustomerResult;

pub struct SaveClientDataInput {
    pub email: Option<String>,
    pub image: Option<UploadedImage>,
    pub coupon_used: bool,
}

pub struct SaveClientDataUseCase<R, S>
where
    R: ClientDataRepository,
    S: VirusScanner,
{
    repo: Arc<R>,
    images: ImageValidator<S>,
}

impl<R, S> SaveClientDataUseCase<R, S>
where
    R: ClientDataRepository,
    S: VirusScanner,
{
    pub fn new(repo: Arc<R>, images: ImageValidator<S>) -> Self {
        Self { repo, images }
    }

    pub async fn execute(&self, caller: &Principal, input: SaveClientDataInput) -> CustomerResult<ClientData> {
        let uid = Uid::new(caller.subject.clone())?;
        let email = ContactEmail::optional(input.email.as_deref())?;

        let image = match input.image {
            Some(upload) => self
                .images
                .validate_optional(Some(&upload))
                .await?
                .map(|_| upload.bytes),
            None => None,
        };

        let saved = self
            .repo
            .upsert(&NewClientData {
                uid,
                email,
                image,
                coupon_used: input.coupon_used,
            })
            .await?;

        tracing::info!(
            uid = %saved.uid,
            has_image = saved.has_image(),
            coupon_used = saved.coupon_used,
            "Client data saved"
        );

        Ok(saved)
    }
}

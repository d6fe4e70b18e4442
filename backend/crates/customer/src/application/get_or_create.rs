//! Get Or Create Client Data Use Case

use std::sync::Arc;

use crate::domain::client_data::{ClientData, NewClientData};
use crate::domain::repository::ClientDataRepository;
use crate::domain::value_object::{ContactEmail, Uid};
use crate::error::CustomerResult;

pub struct GetOrCreateOutput {
    pub client: ClientData,
    pub created: bool,
}

pub struct GetOrCreateClientUseCase<R>
where
    R: ClientDataRepository,
{
    repo: Arc<R>,
}

impl<R> GetOrCreateClientUseCase<R>
where
    R: ClientDataRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// A missing record is created with the caller's token email and an unused coupon
    pub async fn execute(&self, uid: String, token_email: Option<&str>) -> CustomerResult<GetOrCreateOutput> {
        let uid = Uid::new(uid)?;

        if let Some(client) = self.repo.find_by_uid(&uid).await? {
            return Ok(GetOrCreateOutput {
                client,
                created: false,
            });
        }

        // A malformed token email is dropped rather than failing the lookup.
        let email = ContactEmail::optional(token_email).unwrap_or(None);
        let (client, created) = self
            .repo
            .create_if_absent(&NewClientData::first_visit(uid, email))
            .await?;

        if created {
            tracing::info!(uid = %client.uid, "Client data created on first visit");
        }

        Ok(GetOrCreateOutput { client, created })
    }
}

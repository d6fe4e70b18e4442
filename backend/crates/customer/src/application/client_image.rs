//! Client Image Query

use std::sync::Arc;

use crate::domain::repository::ClientDataRepository;
use crate::domain::value_object::Uid;
use crate::error::{CustomerError, CustomerResult};

pub struct ClientImageUseCase<R>
where
    R: ClientDataRepository,
{
    repo: Arc<R>,
}

impl<R> ClientImageUseCase<R>
where
    R: ClientDataRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, uid: String) -> CustomerResult<Vec<u8>> {
        let uid = Uid::new(uid).map_err(|_| CustomerError::ImageNotFound)?;

        self.repo
            .find_by_uid(&uid)
            .await?
            .and_then(|client| client.image)
            .filter(|image| !image.is_empty())
            .ok_or(CustomerError::ImageNotFound)
    }
}

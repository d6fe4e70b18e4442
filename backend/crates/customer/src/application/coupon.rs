//! Coupon Flag Use Case

use std::sync::Arc;

use crate::domain::repository::ClientDataRepository;
use crate::domain::value_object::Uid;
use crate::error::{CustomerError, CustomerResult};

pub struct SetCouponUseCase<R>
where
    R: ClientDataRepository,
{
    repo: Arc<R>,
}

impl<R> SetCouponUseCase<R>
where
    R: ClientDataRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Set the flag and return its new value
    pub async fn execute(&self, uid: String, used: bool) -> CustomerResult<bool> {
        let uid = Uid::new(uid).map_err(|_| CustomerError::ClientNotFound)?;

        if !self.repo.set_coupon_used(&uid, used).await? {
            return Err(CustomerError::ClientNotFound);
        }

        tracing::info!(uid = %uid, coupon_used = used, "Coupon flag updated");
        Ok(used)
    }

    /// Mark the coupon as used when the client exists and has not used it yet
    ///
    /// Returns `true` when the flag changed.
    pub async fn consume(&self, uid: &str) -> CustomerResult<bool> {
        let Ok(uid) = Uid::new(uid) else {
            return Ok(false);
        };

        let claimed = self.repo.claim_coupon(&uid).await?;
        if claimed {
            tracing::info!(uid = %uid, "Discount coupon consumed");
        }
        Ok(claimed)
    }
}

//! Repository Traits

use crate::domain::client_data::{ClientData, NewClientData};
use crate::domain::value_object::Uid;
use crate::error::CustomerResult;

/// Client data repository trait
#[trait_variant::make(ClientDataRepository: Send)]
pub trait LocalClientDataRepository {
    async fn find_by_uid(&self, uid: &Uid) -> CustomerResult<Option<ClientData>>;

    /// Insert unless a record for the uid exists; `true` when inserted
    async fn create_if_absent(&self, data: &NewClientData) -> CustomerResult<(ClientData, bool)>;

    /// Insert or replace email, image and coupon flag of the uid's record
    async fn upsert(&self, data: &NewClientData) -> CustomerResult<ClientData>;

    /// `false` when no record exists
    async fn set_coupon_used(&self, uid: &Uid, used: bool) -> CustomerResult<bool>;

    /// Mark an unused coupon as used; `false` when absent or already used
    async fn claim_coupon(&self, uid: &Uid) -> CustomerResult<bool>;

    /// `false` when no record exists
    async fn set_image(&self, uid: &Uid, image: &[u8]) -> CustomerResult<bool>;
}

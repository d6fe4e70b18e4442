//! Steps shared by the payment use cases

use std::sync::Arc;

use auth::Principal;
use customer::application::SetCouponUseCase;
use customer::domain::{ClientDataRepository, Uid};
use kernel::id::ClientDataId;
use platform::sanitize::contains_script_injection;

use crate::domain::repository::PaymentRepository;
use crate::domain::value_object::PurchaseId;
use crate::error::{PaymentError, PaymentResult};

/// Draws before giving up on finding a free purchase id
pub const MAX_PURCHASE_ID_ATTEMPTS: usize = 32;

/// Checkout data as submitted by the storefront
#[derive(Debug, Clone, Default)]
pub struct PaymentInput {
    pub card_number: Option<String>,
    pub cardholder_name: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub items: Option<String>,
    pub address: Option<String>,
    /// Client uid; the storefront sends the token subject
    pub client_data_id: Option<String>,
    pub used_coupon: bool,
}

/// Random purchase id not yet used by any payment
pub async fn allocate_purchase_id<P>(payments: &P) -> PaymentResult<PurchaseId>
where
    P: PaymentRepository,
{
    for _ in 0..MAX_PURCHASE_ID_ATTEMPTS {
        let candidate = PurchaseId::random();
        if !payments.exists_by_purchase_id(candidate).await? {
            return Ok(candidate);
        }
        tracing::debug!(purchase_id = %candidate, "Purchase id taken, drawing again");
    }
    Err(PaymentError::PurchaseIdExhausted)
}

/// The explicit client uid, or the caller's subject
pub fn client_uid(input: &PaymentInput, caller: &Principal) -> String {
    input
        .client_data_id
        .as_deref()
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
        .unwrap_or(caller.subject.as_str())
        .to_string()
}

pub fn shipping_address(raw: Option<&str>) -> PaymentResult<Option<String>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(address) if contains_script_injection(address) => Err(PaymentError::Validation(
            "Address contains forbidden content".to_string(),
        )),
        Some(address) => Ok(Some(address.to_string())),
    }
}

/// Record id of the client with this uid, if one exists
pub async fn linked_client<C>(clients: &C, uid: &str) -> PaymentResult<Option<ClientDataId>>
where
    C: ClientDataRepository,
{
    let Ok(parsed) = Uid::new(uid) else {
        return Ok(None);
    };

    Ok(clients.find_by_uid(&parsed).await?.map(|client| client.id))
}

/// Spend the client's coupon for a payment that is already stored
///
/// The payment stands even if the flag cannot be written.
pub async fn consume_coupon<C>(clients: &Arc<C>, uid: &str, transaction_id: &str)
where
    C: ClientDataRepository,
{
    if let Err(e) = SetCouponUseCase::new(clients.clone()).consume(uid).await {
        tracing::error!(
            error = %e,
            uid,
            transaction_id,
            "Payment stored but the coupon could not be marked as used"
        );
    }
}

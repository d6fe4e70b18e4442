//! Repository Traits

use crate::domain::payment::{NewPayment, Payment};
use crate::domain::value_object::PurchaseId;
use crate::error::PaymentResult;

/// Payment repository trait
#[trait_variant::make(PaymentRepository: Send)]
pub trait LocalPaymentRepository {
    async fn exists_by_purchase_id(&self, purchase_id: PurchaseId) -> PaymentResult<bool>;

    async fn create(&self, payment: &NewPayment) -> PaymentResult<Payment>;

    async fn find_by_transaction_id(&self, transaction_id: &str) -> PaymentResult<Option<Payment>>;

    /// All payments, newest first
    async fn find_all(&self) -> PaymentResult<Vec<Payment>>;
}

//! Payment Queries

use std::sync::Arc;

use crate::domain::payment::Payment;
use crate::domain::repository::PaymentRepository;
use crate::error::{PaymentError, PaymentResult};

pub struct PaymentQueryUseCase<P>
where
    P: PaymentRepository,
{
    payments: Arc<P>,
}

impl<P> PaymentQueryUseCase<P>
where
    P: PaymentRepository,
{
    pub fn new(payments: Arc<P>) -> Self {
        Self { payments }
    }

    pub async fn by_transaction_id(&self, transaction_id: &str) -> PaymentResult<Payment> {
        self.payments
            .find_by_transaction_id(transaction_id.trim())
            .await?
            .ok_or(PaymentError::NotFound)
    }

    pub async fn list(&self) -> PaymentResult<Vec<Payment>> {
        self.payments.find_all().await
    }
}

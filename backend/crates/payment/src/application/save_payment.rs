//! Save Payment Use Case
//!
//! Records a payment as submitted. Unlike processing, the card is masked
//! only when a full number was sent and the currency is taken from the
//! request.

use std::sync::Arc;

use auth::Principal;
use customer::domain::ClientDataRepository;
use uuid::Uuid;

use crate::application::common::{
    PaymentInput, allocate_purchase_id, client_uid, consume_coupon, linked_client,
    shipping_address,
};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::repository::PaymentRepository;
use crate::domain::value_object::{
    Amount, CardMask, Cardholder, Currency, PaymentStatus, expiry_part,
};
use crate::error::PaymentResult;

pub struct SavePaymentUseCase<P, C>
where
    P: PaymentRepository,
    C: ClientDataRepository,
{
    payments: Arc<P>,
    clients: Arc<C>,
}

impl<P, C> SavePaymentUseCase<P, C>
where
    P: PaymentRepository,
    C: ClientDataRepository,
{
    pub fn new(payments: Arc<P>, clients: Arc<C>) -> Self {
        Self { payments, clients }
    }

    pub async fn execute(&self, caller: &Principal, input: PaymentInput) -> PaymentResult<Payment> {
        let amount = Amount::new(input.amount)?;
        let currency = Currency::parse_or_default(input.currency.as_deref())?;
        let card = CardMask::from_full_number(input.card_number.as_deref());
        let cardholder = Cardholder::optional(input.cardholder_name.as_deref())?;
        let expiry_month = expiry_part(input.expiry_month.as_deref(), "expiry month")?;
        let expiry_year = expiry_part(input.expiry_year.as_deref(), "expiry year")?;
        let address = shipping_address(input.address.as_deref())?;

        let purchase_id = allocate_purchase_id(self.payments.as_ref()).await?;
        let uid = client_uid(&input, caller);
        let client_data_id = linked_client(self.clients.as_ref(), &uid).await?;

        let payment = self
            .payments
            .create(&NewPayment {
                purchase_id,
                transaction_id: Uuid::new_v4().to_string(),
                token: format!("tok_{}", Uuid::new_v4()),
                status: PaymentStatus::Authorized,
                card,
                cardholder,
                expiry_month,
                expiry_year,
                amount,
                currency,
                items: input.items,
                address,
                client_uid: Some(uid.clone()),
                client_data_id,
                used_coupon: input.used_coupon,
            })
            .await?;

        if payment.used_coupon {
            consume_coupon(&self.clients, &uid, &payment.transaction_id).await;
        }

        tracing::info!(
            transaction_id = %payment.transaction_id,
            purchase_id = %payment.purchase_id,
            linked_client = payment.client_data_id.is_some(),
            "Payment saved"
        );

        Ok(payment)
    }
}

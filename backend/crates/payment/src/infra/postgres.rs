//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ClientDataId, PaymentId};
use sqlx::PgPool;

use crate::domain::payment::{NewPayment, Payment};
use crate::domain::repository::PaymentRepository;
use crate::domain::value_object::{
    Amount, CardMask, Cardholder, Currency, PaymentStatus, PurchaseId,
};
use crate::error::PaymentResult;

const PAYMENT_COLUMNS: &str = "id, purchase_id, transaction_id, token, status, card_bin, \
    card_last4, cardholder_name, expiry_month, expiry_year, amount, currency, items, address, \
    client_uid, client_data_id, used_coupon, paid_at";

/// PostgreSQL-backed payment repository
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PaymentRepository for PgPaymentRepository {
    async fn exists_by_purchase_id(&self, purchase_id: PurchaseId) -> PaymentResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM payments WHERE purchase_id = $1)")
                .bind(purchase_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create(&self, payment: &NewPayment) -> PaymentResult<Payment> {
        let sql = format!(
            r#"
            INSERT INTO payments (
                purchase_id, transaction_id, token, status, card_bin, card_last4,
                cardholder_name, expiry_month, expiry_year, amount, currency, items,
                address, client_uid, client_data_id, used_coupon
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {PAYMENT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(payment.purchase_id.value())
            .bind(&payment.transaction_id)
            .bind(&payment.token)
            .bind(payment.status.as_str())
            .bind(payment.card.as_ref().map(CardMask::bin))
            .bind(payment.card.as_ref().map(CardMask::last4))
            .bind(payment.cardholder.as_ref().map(Cardholder::as_str))
            .bind(payment.expiry_month.as_deref())
            .bind(payment.expiry_year.as_deref())
            .bind(payment.amount.value())
            .bind(payment.currency.as_str())
            .bind(payment.items.as_deref())
            .bind(payment.address.as_deref())
            .bind(payment.client_uid.as_deref())
            .bind(payment.client_data_id.map(|id| id.value()))
            .bind(payment.used_coupon)
            .fetch_one(&self.pool)
            .await?;

        row.into_payment()
    }

    async fn find_by_transaction_id(&self, transaction_id: &str) -> PaymentResult<Option<Payment>> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE transaction_id = $1");

        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(PaymentRow::into_payment).transpose()
    }

    async fn find_all(&self) -> PaymentResult<Vec<Payment>> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY paid_at DESC, id DESC");

        let rows = sqlx::query_as::<_, PaymentRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PaymentRow::into_payment).collect()
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    purchase_id: i32,
    transaction_id: String,
    token: String,
    status: String,
    card_bin: Option<String>,
    card_last4: Option<String>,
    cardholder_name: Option<String>,
    expiry_month: Option<String>,
    expiry_year: Option<String>,
    amount: f64,
    currency: String,
    items: Option<String>,
    address: Option<String>,
    client_uid: Option<String>,
    client_data_id: Option<i64>,
    used_coupon: bool,
    paid_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> PaymentResult<Payment> {
        let status: PaymentStatus = self
            .status
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

        let card = match (self.card_bin, self.card_last4) {
            (Some(bin), Some(last4)) => Some(CardMask::from_db(bin, last4)),
            _ => None,
        };

        Ok(Payment {
            id: PaymentId::from_db(self.id),
            purchase_id: PurchaseId::from_db(self.purchase_id),
            transaction_id: self.transaction_id,
            token: self.token,
            status,
            card,
            cardholder: self.cardholder_name.map(Cardholder::from_db),
            expiry_month: self.expiry_month,
            expiry_year: self.expiry_year,
            amount: Amount::from_db(self.amount),
            currency: Currency::from_db(self.currency.trim_end().to_string()),
            items: self.items,
            address: self.address,
            client_uid: self.client_uid,
            client_data_id: self.client_data_id.map(ClientDataId::from_db),
            used_coupon: self.used_coupon,
            paid_at: self.paid_at,
        })
    }
}

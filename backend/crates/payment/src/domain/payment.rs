//! Payment Entity

use chrono::{DateTime, Utc};
use kernel::id::{ClientDataId, PaymentId};

use crate::domain::value_object::{Amount, CardMask, Cardholder, Currency, PaymentStatus, PurchaseId};

/// A recorded card authorization
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: PaymentId,
    pub purchase_id: PurchaseId,
    pub transaction_id: String,
    pub token: String,
    pub status: PaymentStatus,
    pub card: Option<CardMask>,
    pub cardholder: Option<Cardholder>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub amount: Amount,
    pub currency: Currency,
    /// Cart contents as sent by the storefront (opaque JSON text)
    pub items: Option<String>,
    pub address: Option<String>,
    /// Identity-provider subject of the paying client
    pub client_uid: Option<String>,
    pub client_data_id: Option<ClientDataId>,
    pub used_coupon: bool,
    pub paid_at: DateTime<Utc>,
}

/// A payment ready to be inserted
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub purchase_id: PurchaseId,
    pub transaction_id: String,
    pub token: String,
    pub status: PaymentStatus,
    pub card: Option<CardMask>,
    pub cardholder: Option<Cardholder>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub amount: Amount,
    pub currency: Currency,
    pub items: Option<String>,
    pub address: Option<String>,
    pub client_uid: Option<String>,
    pub client_data_id: Option<ClientDataId>,
    pub used_coupon: bool,
}

//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::{ClientDataId, PaymentId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::PaymentInput;
use crate::domain::payment::Payment;
use crate::domain::value_object::PaymentStatus;

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /api/payments/process` and `POST /api/payments/save`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentRequest {
    pub card_number: Option<String>,
    pub cardholder_name: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    /// Cart contents; a JSON string is stored as is, anything else is serialized
    pub items: Option<serde_json::Value>,
    #[serde(alias = "direccion")]
    pub address: Option<String>,
    #[serde(deserialize_with = "client_reference")]
    pub client_data_id: Option<String>,
    pub used_coupon: bool,
}

/// The storefront sends the client uid, older clients a numeric id
fn client_reference<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Reference {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Reference>::deserialize(deserializer)? {
        Some(Reference::Text(uid)) => Some(uid),
        Some(Reference::Number(id)) => Some(id.to_string()),
        None => None,
    })
}

impl From<PaymentRequest> for PaymentInput {
    fn from(req: PaymentRequest) -> Self {
        let items = req.items.and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });

        Self {
            card_number: req.card_number,
            cardholder_name: req.cardholder_name,
            expiry_month: req.expiry_month,
            expiry_year: req.expiry_year,
            amount: req.amount,
            currency: req.currency,
            items,
            address: req.address,
            client_data_id: req.client_data_id,
            used_coupon: req.used_coupon,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Answer of `POST /api/payments/process`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentResponse {
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub token: String,
    pub card_bin: Option<String>,
    pub card_last4: Option<String>,
    pub cardholder_name: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub used_coupon: bool,
    /// Client uid the payment was recorded for
    pub client_data_id: Option<String>,
}

impl From<Payment> for ProcessPaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            card_bin: payment.card.as_ref().map(|c| c.bin().to_string()),
            card_last4: payment.card.as_ref().map(|c| c.last4().to_string()),
            cardholder_name: payment.cardholder.map(|c| c.as_str().to_string()),
            transaction_id: payment.transaction_id,
            status: payment.status,
            token: payment.token,
            expiry_month: payment.expiry_month,
            expiry_year: payment.expiry_year,
            amount: payment.amount.value(),
            currency: payment.currency.to_string(),
            used_coupon: payment.used_coupon,
            client_data_id: payment.client_uid,
        }
    }
}

/// Stored payment as returned by the read endpoints and `/save`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: PaymentId,
    pub purchase_id: i32,
    pub transaction_id: String,
    pub token: String,
    pub status: PaymentStatus,
    pub card_bin: Option<String>,
    pub card_last4: Option<String>,
    pub cardholder_name: Option<String>,
    pub expiry_month: Option<String>,
    pub expiry_year: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub items: Option<String>,
    pub address: Option<String>,
    pub client_uid: Option<String>,
    pub client_data_id: Option<ClientDataId>,
    pub used_coupon: bool,
    pub paid_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            purchase_id: payment.purchase_id.value(),
            card_bin: payment.card.as_ref().map(|c| c.bin().to_string()),
            card_last4: payment.card.as_ref().map(|c| c.last4().to_string()),
            cardholder_name: payment.cardholder.map(|c| c.as_str().to_string()),
            transaction_id: payment.transaction_id,
            token: payment.token,
            status: payment.status,
            expiry_month: payment.expiry_month,
            expiry_year: payment.expiry_year,
            amount: payment.amount.value(),
            currency: payment.currency.to_string(),
            items: payment.items,
            address: payment.address,
            client_uid: payment.client_uid,
            client_data_id: payment.client_data_id,
            used_coupon: payment.used_coupon,
            paid_at: payment.paid_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_spanish_address_and_numeric_client() {
        let req: PaymentRequest = serde_json::from_value(serde_json::json!({
            "cardNumber": "4111111111111111",
            "amount": 120000.0,
            "items": [{ "productId": 3, "quantity": 2 }],
            "direccion": "Calle 10 # 4-21",
            "clientDataId": 42,
            "usedCoupon": true
        }))
        .unwrap();

        let input = PaymentInput::from(req);
        assert_eq!(input.address.as_deref(), Some("Calle 10 # 4-21"));
        assert_eq!(input.client_data_id.as_deref(), Some("42"));
        assert_eq!(input.items.as_deref(), Some(r#"[{"productId":3,"quantity":2}]"#));
        assert!(input.used_coupon);
    }

    #[test]
    fn test_request_defaults() {
        let req: PaymentRequest = serde_json::from_str(r#"{"items":"[]","clientDataId":null}"#).unwrap();
        let input = PaymentInput::from(req);
        assert_eq!(input.items.as_deref(), Some("[]"));
        assert!(input.client_data_id.is_none());
        assert!(input.amount.is_none());
        assert!(!input.used_coupon);
    }
}

//! API DTOs (Data Transfer Objects)
//!
//! Field names (`correo`, `imagen`, `usoCodigoDescuento`) are the ones the
//! storefront already sends and reads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use kernel::id::ClientDataId;
use serde::{Deserialize, Serialize};

use crate::domain::client_data::ClientData;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDataDto {
    pub id: ClientDataId,
    pub uid: String,
    pub correo: Option<String>,
    /// Base64 of the stored picture
    pub imagen: Option<String>,
    pub uso_codigo_descuento: bool,
}

impl From<ClientData> for ClientDataDto {
    fn from(client: ClientData) -> Self {
        Self {
            id: client.id,
            imagen: client
                .image
                .as_deref()
                .filter(|img| !img.is_empty())
                .map(|img| STANDARD.encode(img)),
            uid: client.uid.as_str().to_string(),
            correo: client.email.map(|e| e.as_str().to_string()),
            uso_codigo_descuento: client.coupon_used,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponQuery {
    pub use_coupon: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub uso_codigo_descuento: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of the coupon endpoint's 404
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

//! Client Data Entity
//!
//! Profile data kept per identity-provider subject: contact email, an
//! optional profile picture and whether the one-time discount coupon has
//! been used.

use kernel::id::ClientDataId;

use crate::domain::value_object::{ContactEmail, Uid};

#[derive(Debug, Clone)]
pub struct ClientData {
    pub id: ClientDataId,
    pub uid: Uid,
    pub email: Option<ContactEmail>,
    pub image: Option<Vec<u8>>,
    pub coupon_used: bool,
}

impl ClientData {
    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|img| !img.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct NewClientData {
    pub uid: Uid,
    pub email: Option<ContactEmail>,
    pub image: Option<Vec<u8>>,
    pub coupon_used: bool,
}

impl NewClientData {
    /// Record created on first lookup
    pub fn first_visit(uid: Uid, email: Option<ContactEmail>) -> Self {
        Self {
            uid,
            email,
            image: None,
            coupon_used: false,
        }
    }
}

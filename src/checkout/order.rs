use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::checkout::cart::CartLine;
use crate::checkout::session::{CheckoutSession, CheckoutTotals, DeliveryAddress, PaymentSelection};
use crate::pricing::DeliveryMethod;

const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const REFERENCE_LEN: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: Uuid,
    /// Short code the buyer quotes at the pickup counter or to support
    pub reference: String,
    pub items: Vec<CartLine>,
    pub totals: CheckoutTotals,
    pub delivery_method: DeliveryMethod,
    pub address: Option<DeliveryAddress>,
    pub pickup_point_id: Option<String>,
    pub payment: Option<PaymentSelection>,
    pub coupon_code: Option<String>,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    pub fn from_session(session: &CheckoutSession) -> Self {
        let (address, pickup_point_id) = match session.delivery_method {
            DeliveryMethod::Home => (session.address.clone(), None),
            DeliveryMethod::Pickup => (None, session.pickup_point_id.clone()),
        };

        Self {
            id: Uuid::new_v4(),
            reference: generate_reference(),
            items: session.items.clone(),
            totals: session.totals(),
            delivery_method: session.delivery_method,
            address,
            pickup_point_id,
            payment: session.payment.clone(),
            coupon_code: session.coupon.as_ref().map(|c| c.code.clone()),
            placed_at: Utc::now(),
        }
    }
}

/// `CMD-` followed by characters that can't be misread (no 0/O, 1/I)
pub fn generate_reference() -> String {
    let mut rng = rand::thread_rng();
    let code: String = (0..REFERENCE_LEN)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect();
    format!("CMD-{}", code)
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Coupon, CouponKind};
use crate::utils::money::{percentage_of, Fcfa};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponError {
    #[error("Please enter a coupon code")]
    EmptyCode,

    #[error("Coupon {0} is invalid or expired")]
    NotFound(String),

    #[error("Coupon {code} requires a minimum order of {minimum} FCFA")]
    BelowMinimum { code: String, minimum: Fcfa },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    /// Normalized (uppercase) code
    pub code: String,
    pub discount: Fcfa,
}

impl Coupon {
    /// Discount this coupon grants on `subtotal`, never more than the subtotal itself
    pub fn discount_for(&self, subtotal: Fcfa) -> Fcfa {
        let raw = match self.kind {
            CouponKind::Percentage => {
                let amount = percentage_of(subtotal, self.value);
                match self.max_discount_amount {
                    Some(cap) => amount.min(cap),
                    None => amount,
                }
            }
            CouponKind::Fixed => Fcfa::from(self.value),
        };

        raw.clamp(0, subtotal.max(0))
    }
}

pub fn evaluate_coupon(catalog: &Catalog, code: &str, subtotal: Fcfa) -> Result<AppliedCoupon, CouponError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(CouponError::EmptyCode);
    }
    let normalized = code.to_uppercase();

    let coupon = catalog
        .coupon(code)
        .filter(|c| c.active)
        .ok_or_else(|| CouponError::NotFound(normalized.clone()))?;

    if subtotal < coupon.min_order_amount {
        return Err(CouponError::BelowMinimum {
            code: normalized,
            minimum: coupon.min_order_amount,
        });
    }

    Ok(AppliedCoupon {
        discount: coupon.discount_for(subtotal),
        code: normalized,
    })
}

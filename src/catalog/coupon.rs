use serde::{Deserialize, Serialize};

use crate::utils::money::Fcfa;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub kind: CouponKind,
    /// Percent for `Percentage` coupons, FCFA for `Fixed` ones
    pub value: u32,
    #[serde(default)]
    pub min_order_amount: Fcfa,
    #[serde(default)]
    pub max_discount_amount: Option<Fcfa>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

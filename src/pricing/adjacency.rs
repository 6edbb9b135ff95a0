use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::RegionCode;
use crate::utils::money::Fcfa;

pub const SAME_REGION_PRICE: Fcfa = 1500;
pub const ADJACENT_REGION_PRICE: Fcfa = 3000;
pub const FAR_REGION_PRICE: Fcfa = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionProximity {
    Same,
    Adjacent,
    Far,
}

impl RegionProximity {
    pub fn classify(buyer: RegionCode, seller: RegionCode) -> Self {
        if buyer == seller {
            RegionProximity::Same
        } else if buyer.is_adjacent_to(seller) {
            RegionProximity::Adjacent
        } else {
            RegionProximity::Far
        }
    }

    pub fn price(&self) -> Fcfa {
        match self {
            RegionProximity::Same => SAME_REGION_PRICE,
            RegionProximity::Adjacent => ADJACENT_REGION_PRICE,
            RegionProximity::Far => FAR_REGION_PRICE,
        }
    }
}

/// Sum of per-region prices over the distinct seller regions
pub fn adjacency_delivery_fee<I>(buyer: RegionCode, seller_regions: I) -> Fcfa
where
    I: IntoIterator<Item = RegionCode>,
{
    seller_regions
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|seller| RegionProximity::classify(buyer, seller).price())
        .sum()
}

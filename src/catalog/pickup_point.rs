use serde::{Deserialize, Serialize};

use crate::catalog::{region::RegionCode, LocalizedText};
use crate::utils::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupCategory {
    Hub,
    Partner,
    Vendor,
}

/// A fixed location where an order can be collected instead of delivered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupPoint {
    pub id: String,
    pub region: RegionCode,
    pub location: Coordinate,
    pub name: LocalizedText,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub category: PickupCategory,
}

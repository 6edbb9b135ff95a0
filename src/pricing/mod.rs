//! Delivery pricing.
//!
//! Two tables price the same domain and are deliberately kept apart:
//! - [`adjacency`]: same/adjacent/far region classification, used for home
//!   delivery unless `DELIVERY_PRICING_MODEL=distance`.
//! - [`tiered`]: distance brackets, always used for pickup points (seller
//!   region centroid to pickup location) and for home delivery under the
//!   `distance` model (centroid to centroid).
//!
//! Both charge once per distinct seller region in the cart.

pub mod adjacency;
pub mod tiered;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{PickupPoint, RegionCode};
use crate::utils::geo::{haversine_distance, Coordinate};
use crate::utils::money::Fcfa;

pub use adjacency::{adjacency_delivery_fee, RegionProximity};
pub use tiered::tiered_delivery_cost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingModel {
    Adjacency,
    Distance,
}

impl FromStr for PricingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacency" => Ok(PricingModel::Adjacency),
            "distance" => Ok(PricingModel::Distance),
            other => Err(format!("unknown pricing model '{}'", other)),
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingModel::Adjacency => f.write_str("adjacency"),
            PricingModel::Distance => f.write_str("distance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Home,
    Pickup,
}

/// Where the parcel ends up
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    Home(RegionCode),
    Pickup(&'a PickupPoint),
}

impl Destination<'_> {
    pub fn method(&self) -> DeliveryMethod {
        match self {
            Destination::Home(_) => DeliveryMethod::Home,
            Destination::Pickup(_) => DeliveryMethod::Pickup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeLine {
    pub seller_region: RegionCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<RegionProximity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub fee: Fcfa,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryQuote {
    pub method: DeliveryMethod,
    pub model: PricingModel,
    pub fee: Fcfa,
    pub lines: Vec<FeeLine>,
}

/// Price delivery of goods from `seller_regions` to `destination`.
/// `home_model` selects the table for home delivery; pickup is always distance-priced.
pub fn quote_delivery<I>(home_model: PricingModel, destination: Destination<'_>, seller_regions: I) -> DeliveryQuote
where
    I: IntoIterator<Item = RegionCode>,
{
    let sellers: BTreeSet<RegionCode> = seller_regions.into_iter().collect();

    let (model, lines): (PricingModel, Vec<FeeLine>) = match destination {
        Destination::Home(buyer) => match home_model {
            PricingModel::Adjacency => (
                PricingModel::Adjacency,
                sellers
                    .iter()
                    .map(|&seller| {
                        let proximity = RegionProximity::classify(buyer, seller);
                        FeeLine {
                            seller_region: seller,
                            proximity: Some(proximity),
                            distance_km: None,
                            fee: proximity.price(),
                        }
                    })
                    .collect(),
            ),
            PricingModel::Distance => (
                PricingModel::Distance,
                distance_lines(&sellers, buyer.center()),
            ),
        },
        Destination::Pickup(point) => (
            PricingModel::Distance,
            distance_lines(&sellers, point.location),
        ),
    };

    DeliveryQuote {
        method: destination.method(),
        model,
        fee: lines.iter().map(|line| line.fee).sum(),
        lines,
    }
}

fn distance_lines(sellers: &BTreeSet<RegionCode>, target: Coordinate) -> Vec<FeeLine> {
    sellers
        .iter()
        .map(|&seller| {
            let distance = haversine_distance(seller.center(), target);
            FeeLine {
                seller_region: seller,
                proximity: None,
                distance_km: Some(distance),
                fee: tiered_delivery_cost(distance),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_home_adjacency_quote_matches_fee_function() {
        let sellers = [RegionCode::Lt, RegionCode::Ou, RegionCode::Lt, RegionCode::En];
        let quote = quote_delivery(PricingModel::Adjacency, Destination::Home(RegionCode::Lt), sellers);

        assert_eq!(quote.method, DeliveryMethod::Home);
        assert_eq!(quote.model, PricingModel::Adjacency);
        assert_eq!(quote.lines.len(), 3);
        assert_eq!(quote.fee, adjacency_delivery_fee(RegionCode::Lt, sellers));
        assert_eq!(quote.fee, 1500 + 3000 + 5000);
    }

    #[test]
    fn test_home_distance_quote_same_region_is_cheapest_tier() {
        let quote = quote_delivery(PricingModel::Distance, Destination::Home(RegionCode::Ce), [RegionCode::Ce]);
        assert_eq!(quote.model, PricingModel::Distance);
        assert_eq!(quote.fee, 500);
        assert_eq!(quote.lines[0].distance_km, Some(0.0));
    }

    #[test]
    fn test_models_can_disagree() {
        // Douala -> Yaounde is adjacent (3000) but ~195 km by distance (5000)
        let adjacency = quote_delivery(PricingModel::Adjacency, Destination::Home(RegionCode::Ce), [RegionCode::Lt]);
        let distance = quote_delivery(PricingModel::Distance, Destination::Home(RegionCode::Ce), [RegionCode::Lt]);
        assert_eq!(adjacency.fee, 3000);
        assert_eq!(distance.fee, 5000);
    }

    #[test]
    fn test_pickup_ignores_home_model() {
        let catalog = Catalog::bundled().unwrap();
        let akwa = catalog.pickup_point("pp-douala-akwa").unwrap();
        let quote = quote_delivery(PricingModel::Adjacency, Destination::Pickup(akwa), [RegionCode::Lt]);

        assert_eq!(quote.method, DeliveryMethod::Pickup);
        assert_eq!(quote.model, PricingModel::Distance);
        // Akwa is a few km from the Douala centroid
        assert_eq!(quote.fee, 1000);
    }

    #[test]
    fn test_pricing_model_parse() {
        assert_eq!("Distance".parse::<PricingModel>().unwrap(), PricingModel::Distance);
        assert!("cheapest".parse::<PricingModel>().is_err());
    }
}

//! Static catalog records: regions, products, vendors, pickup points, coupons.
//!
//! Regions are compiled in. Everything else is loaded once at startup, either
//! from the bundled `data/catalog.json` or from a file named by `CATALOG_PATH`,
//! and never mutated afterwards.

pub mod coupon;
pub mod pickup_point;
pub mod product;
pub mod region;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub use coupon::{Coupon, CouponKind};
pub use pickup_point::{PickupCategory, PickupPoint};
pub use product::{Product, Vendor};
pub use region::{Region, RegionCode};

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Text shown in both storefront languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub fr: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(fr: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            fr: fr.into(),
            en: en.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub vendors: Vec<Vendor>,
    pub pickup_points: Vec<PickupPoint>,
    pub coupons: Vec<Coupon>,
}

impl Catalog {
    pub fn bundled() -> AppResult<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load the catalog at `path`, or the bundled one when no path is given
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Internal(format!("Failed to read catalog {}: {}", path.display(), e))
                })?;
                Self::from_json(&raw)
            }
            None => Self::bundled(),
        }
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        let catalog: Catalog = serde_json::from_str(raw)
            .map_err(|e| AppError::Internal(format!("Invalid catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> AppResult<()> {
        for product in &self.products {
            if self.vendor(&product.vendor_id).is_none() {
                return Err(AppError::Internal(format!(
                    "Product {} references unknown vendor {}",
                    product.id, product.vendor_id
                )));
            }
            if product.price < 0 {
                return Err(AppError::Internal(format!(
                    "Product {} has a negative price",
                    product.id
                )));
            }
        }
        Ok(())
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn vendor(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    pub fn pickup_point(&self, id: &str) -> Option<&PickupPoint> {
        self.pickup_points.iter().find(|p| p.id == id)
    }

    /// Coupon codes match case-insensitively
    pub fn coupon(&self, code: &str) -> Option<&Coupon> {
        self.coupons
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Region of the vendor selling `product_id`
    pub fn seller_region(&self, product_id: &str) -> Option<RegionCode> {
        let product = self.product(product_id)?;
        self.vendor(&product.vendor_id).map(|v| v.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.products.is_empty());
        assert!(!catalog.pickup_points.is_empty());
        assert!(catalog.coupon("bienvenue10").is_some());
    }

    #[test]
    fn test_rejects_dangling_vendor() {
        let raw = r#"{
            "products": [{"id": "p", "name": {"fr": "x", "en": "x"}, "price": 100, "stock": 1, "vendor_id": "ghost"}],
            "vendors": [], "pickup_points": [], "coupons": []
        }"#;
        assert!(matches!(Catalog::from_json(raw), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_seller_region_follows_vendor() {
        let catalog = Catalog::bundled().unwrap();
        let product = &catalog.products[0];
        let vendor = catalog.vendor(&product.vendor_id).unwrap();
        assert_eq!(catalog.seller_region(&product.id), Some(vendor.region));
        assert_eq!(catalog.seller_region("missing"), None);
    }
}

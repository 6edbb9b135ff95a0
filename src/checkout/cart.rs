use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Product, RegionCode};
use crate::utils::money::Fcfa;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Your cart is empty")]
    Empty,

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("{0} is out of stock")]
    OutOfStock(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

/// Clamp a requested quantity into `[1, stock]`
fn bounded_quantity(product: &Product, requested: u32) -> Result<u32, CartError> {
    if product.stock == 0 {
        return Err(CartError::OutOfStock(product.id.clone()));
    }
    Ok(requested.clamp(1, product.stock))
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from client-supplied lines, merging duplicates and
    /// clamping every quantity against current stock.
    pub fn from_lines(catalog: &Catalog, lines: &[CartLine]) -> Result<Self, CartError> {
        let mut cart = Cart::new();
        for line in lines {
            cart.add(catalog, &line.product_id, line.quantity)?;
        }
        Ok(cart)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` units, merging into an existing line. Returns the line's new quantity.
    pub fn add(&mut self, catalog: &Catalog, product_id: &str, quantity: u32) -> Result<u32, CartError> {
        let product = catalog
            .product(product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.to_string()))?;

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = bounded_quantity(product, line.quantity.saturating_add(quantity))?;
                Ok(line.quantity)
            }
            None => {
                let quantity = bounded_quantity(product, quantity)?;
                self.lines.push(CartLine {
                    product_id: product_id.to_string(),
                    quantity,
                });
                Ok(quantity)
            }
        }
    }

    /// Replace a line's quantity, clamped into `[1, stock]`
    pub fn set_quantity(&mut self, catalog: &Catalog, product_id: &str, quantity: u32) -> Result<u32, CartError> {
        let product = catalog
            .product(product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.to_string()))?;
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CartError::UnknownProduct(product_id.to_string()))?;

        line.quantity = bounded_quantity(product, quantity)?;
        Ok(line.quantity)
    }

    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    pub fn subtotal(&self, catalog: &Catalog) -> Result<Fcfa, CartError> {
        self.lines.iter().try_fold(0, |acc: Fcfa, line| -> Result<Fcfa, CartError> {
            let product = catalog
                .product(&line.product_id)
                .ok_or_else(|| CartError::UnknownProduct(line.product_id.clone()))?;
            Ok(acc.saturating_add(product.price.saturating_mul(Fcfa::from(line.quantity))))
        })
    }

    /// Distinct regions the cart ships from
    pub fn seller_regions(&self, catalog: &Catalog) -> Result<BTreeSet<RegionCode>, CartError> {
        self.lines
            .iter()
            .map(|line| {
                catalog
                    .seller_region(&line.product_id)
                    .ok_or_else(|| CartError::UnknownProduct(line.product_id.clone()))
            })
            .collect()
    }
}

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, RegionCode};
use crate::checkout::cart::{Cart, CartError, CartLine};
use crate::checkout::coupon::evaluate_coupon;
use crate::checkout::session::{CheckoutError, CheckoutTotals};
use crate::error::AppResult;
use crate::pricing::{quote_delivery, DeliveryMethod, DeliveryQuote, Destination, PricingModel};
use crate::utils::money::Fcfa;

#[derive(Debug, Clone, Deserialize)]
pub struct CartQuoteRequest {
    pub items: Vec<CartLine>,
    pub buyer_region: RegionCode,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub pickup_point_id: Option<String>,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// What the cart hands to checkout when the buyer proceeds
#[derive(Debug, Clone, Serialize)]
pub struct CartQuote {
    pub items: Vec<CartLine>,
    pub subtotal: Fcfa,
    pub delivery_fee: Fcfa,
    pub coupon_discount: Fcfa,
    pub total: Fcfa,
    pub delivery_method: DeliveryMethod,
    pub applied_coupon_code: Option<String>,
    pub delivery: DeliveryQuote,
}

pub fn quote_cart(catalog: &Catalog, home_model: PricingModel, request: &CartQuoteRequest) -> AppResult<CartQuote> {
    let cart = Cart::from_lines(catalog, &request.items)?;
    if cart.is_empty() {
        return Err(CartError::Empty.into());
    }

    let subtotal = cart.subtotal(catalog)?;
    let sellers = cart.seller_regions(catalog)?;

    let destination = match request.delivery_method {
        DeliveryMethod::Home => Destination::Home(request.buyer_region),
        DeliveryMethod::Pickup => {
            let id = request
                .pickup_point_id
                .as_deref()
                .ok_or(CheckoutError::MissingPickupPoint)?;
            let point = catalog
                .pickup_point(id)
                .ok_or_else(|| CheckoutError::UnknownPickupPoint(id.to_string()))?;
            Destination::Pickup(point)
        }
    };
    let delivery = quote_delivery(home_model, destination, sellers);

    let applied = match request.coupon_code.as_deref() {
        Some(code) => Some(evaluate_coupon(catalog, code, subtotal)?),
        None => None,
    };

    let totals = CheckoutTotals::new(
        subtotal,
        delivery.fee,
        applied.as_ref().map(|c| c.discount).unwrap_or(0),
    );

    Ok(CartQuote {
        items: cart.lines().to_vec(),
        subtotal: totals.subtotal,
        delivery_fee: totals.delivery_fee,
        coupon_discount: totals.coupon_discount,
        total: totals.total,
        delivery_method: request.delivery_method,
        applied_coupon_code: applied.map(|c| c.code),
        delivery,
    })
}

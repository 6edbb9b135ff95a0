use axum::{extract::State, Json};
use serde::Deserialize;

use crate::catalog::RegionCode;
use crate::checkout::{evaluate_coupon, quote_cart, AppliedCoupon, CartQuote, CartQuoteRequest};
use crate::error::{AppError, AppResult};
use crate::pricing::{quote_delivery, DeliveryMethod, DeliveryQuote, Destination};
use crate::utils::money::Fcfa;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DeliveryQuoteRequest {
    pub buyer_region: RegionCode,
    pub seller_regions: Vec<RegionCode>,
    #[serde(default)]
    pub method: DeliveryMethod,
    #[serde(default)]
    pub pickup_point_id: Option<String>,
}

/// Price delivery for a set of seller regions without a cart
pub async fn delivery_quote(
    State(state): State<AppState>,
    Json(payload): Json<DeliveryQuoteRequest>,
) -> AppResult<Json<DeliveryQuote>> {
    let catalog = state.catalog();
    let destination = match payload.method {
        DeliveryMethod::Home => Destination::Home(payload.buyer_region),
        DeliveryMethod::Pickup => {
            let id = payload
                .pickup_point_id
                .as_deref()
                .ok_or_else(|| AppError::BadRequest("pickup_point_id is required".to_string()))?;
            let point = catalog
                .pickup_point(id)
                .ok_or_else(|| AppError::NotFound(format!("Pickup point {} not found", id)))?;
            Destination::Pickup(point)
        }
    };

    Ok(Json(quote_delivery(
        state.checkout.home_model(),
        destination,
        payload.seller_regions,
    )))
}

/// Totals for the cart screen; this is what the client sends on to checkout
pub async fn cart_quote(
    State(state): State<AppState>,
    Json(payload): Json<CartQuoteRequest>,
) -> AppResult<Json<CartQuote>> {
    let quote = quote_cart(state.catalog(), state.checkout.home_model(), &payload)?;
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct ValidateCouponRequest {
    pub code: String,
    pub subtotal: Fcfa,
}

/// Check a coupon against a subtotal without touching any checkout
pub async fn validate_coupon(
    State(state): State<AppState>,
    Json(payload): Json<ValidateCouponRequest>,
) -> AppResult<Json<AppliedCoupon>> {
    if payload.subtotal < 0 {
        return Err(AppError::BadRequest("subtotal must not be negative".to_string()));
    }

    let catalog = state.catalog();
    let applied = state
        .checkout
        .remote(async { evaluate_coupon(catalog, &payload.code, payload.subtotal).map_err(AppError::from) })
        .await?;
    Ok(Json(applied))
}

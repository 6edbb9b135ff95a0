use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checkout::{AppliedCoupon, CheckoutTotals, Order, PaymentSelection};
use crate::error::AppResult;
use crate::services::{CheckoutView, DeliverySelection, StartCheckoutRequest};
use crate::AppState;

/// Start a checkout from the cart screen's payload
pub async fn start_checkout(
    State(state): State<AppState>,
    Json(payload): Json<StartCheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutView>)> {
    let view = state.checkout.start(payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CheckoutView>> {
    Ok(Json(state.checkout.get(id).await?))
}

/// Discard a checkout
pub async fn cancel_checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.checkout.cancel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyCouponResponse {
    pub coupon: AppliedCoupon,
    pub totals: CheckoutTotals,
}

pub async fn apply_coupon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApplyCouponResponse>> {
    let coupon = state.checkout.apply_coupon(id, &payload.code).await?;
    let totals = state.checkout.get(id).await?.totals;
    Ok(Json(ApplyCouponResponse { coupon, totals }))
}

pub async fn remove_coupon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CheckoutView>> {
    Ok(Json(state.checkout.remove_coupon(id).await?))
}

/// Choose home delivery (with address) or pickup (with pickup point)
pub async fn select_delivery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeliverySelection>,
) -> AppResult<Json<CheckoutView>> {
    Ok(Json(state.checkout.select_delivery(id, payload).await?))
}

pub async fn select_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentSelection>,
) -> AppResult<Json<CheckoutView>> {
    Ok(Json(state.checkout.select_payment(id, payload).await?))
}

pub async fn next_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CheckoutView>> {
    Ok(Json(state.checkout.advance(id).await?))
}

pub async fn previous_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CheckoutView>> {
    Ok(Json(state.checkout.back(id).await?))
}

/// Place the order from the review step
pub async fn place_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state.checkout.place_order(id).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.checkout.order(id).await?))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::catalog::product::ContactOption;
use crate::error::AppResult;
use crate::services::{SendMessageRequest, VendorMessage};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct VendorContactResponse {
    pub vendor_id: String,
    pub name: String,
    pub options: Vec<ContactOption>,
}

/// Contact sheet for a vendor; channels without data come back disabled
pub async fn vendor_contact(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
) -> AppResult<Json<VendorContactResponse>> {
    let vendor = state.messaging.vendor(&vendor_id)?;
    Ok(Json(VendorContactResponse {
        options: vendor.contact_options(),
        vendor_id: vendor.id,
        name: vendor.name,
    }))
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(vendor_id): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<VendorMessage>)> {
    let message = state.messaging.send(&vendor_id, payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

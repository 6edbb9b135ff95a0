use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::Vendor;
use crate::error::{AppError, AppResult};
use crate::services::checkout::CheckoutService;
use crate::utils::validation::{validate_message, validate_phone};

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
    #[serde(default)]
    pub product_id: Option<String>,
    /// Optional callback number for the vendor
    #[serde(default)]
    pub reply_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VendorMessage {
    pub id: Uuid,
    pub vendor_id: String,
    pub product_id: Option<String>,
    pub body: String,
    pub reply_phone: Option<String>,
    pub sent_at: DateTime<Utc>,
}

/// Buyer-to-vendor messages, kept in memory per vendor
#[derive(Clone)]
pub struct MessagingService {
    checkout: CheckoutService,
    inbox: Arc<RwLock<HashMap<String, Vec<VendorMessage>>>>,
}

impl MessagingService {
    pub fn new(checkout: CheckoutService) -> Self {
        Self {
            checkout,
            inbox: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn vendor(&self, vendor_id: &str) -> AppResult<Vendor> {
        self.checkout
            .catalog()
            .vendor(vendor_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Vendor {} not found", vendor_id)))
    }

    pub async fn send(&self, vendor_id: &str, request: SendMessageRequest) -> AppResult<VendorMessage> {
        let vendor = self.vendor(vendor_id)?;
        let body = validate_message(&request.body)?;
        let reply_phone = match request.reply_phone.as_deref().map(str::trim) {
            Some(phone) if !phone.is_empty() => Some(validate_phone(phone)?),
            _ => None,
        };
        if let Some(product_id) = request.product_id.as_deref() {
            let sold_here = self
                .checkout
                .catalog()
                .product(product_id)
                .is_some_and(|p| p.vendor_id == vendor.id);
            if !sold_here {
                return Err(AppError::BadRequest(format!(
                    "{} does not sell {}",
                    vendor.name, product_id
                )));
            }
        }

        // Delivery goes through the same latency/timeout contract as checkout calls
        self.checkout.remote(async { Ok(()) }).await?;

        let message = VendorMessage {
            id: Uuid::new_v4(),
            vendor_id: vendor.id.clone(),
            product_id: request.product_id,
            body,
            reply_phone,
            sent_at: Utc::now(),
        };
        tracing::info!(vendor_id = %vendor.id, message_id = %message.id, "Message sent to vendor");

        self.inbox
            .write()
            .await
            .entry(vendor.id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    pub async fn messages_for(&self, vendor_id: &str) -> Vec<VendorMessage> {
        self.inbox
            .read()
            .await
            .get(vendor_id)
            .cloned()
            .unwrap_or_default()
    }
}

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Catalog, RegionCode};
use crate::checkout::cart::{Cart, CartError, CartLine};
use crate::checkout::coupon::{evaluate_coupon, AppliedCoupon, CouponError};
use crate::pricing::{quote_delivery, DeliveryMethod, DeliveryQuote, Destination, PricingModel};
use crate::utils::money::Fcfa;
use crate::utils::validation::{require, validate_phone, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Please select a delivery address")]
    MissingAddress,

    #[error("Please select a pickup point")]
    MissingPickupPoint,

    #[error("Please select a payment method")]
    MissingPaymentMethod,

    #[error("Unknown pickup point: {0}")]
    UnknownPickupPoint(String),

    #[error("Review is the last step, place the order instead")]
    NoNextStep,

    #[error("Orders can only be placed from the review step")]
    NotReadyToPlace,

    #[error("Your order is already being processed")]
    AlreadyProcessing,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Coupon(#[from] CouponError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Delivery,
    Payment,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    MtnMobileMoney,
    OrangeMoney,
    Card,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Mobile money is charged to a phone number
    pub fn is_mobile_money(&self) -> bool {
        matches!(self, PaymentMethod::MtnMobileMoney | PaymentMethod::OrangeMoney)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSelection {
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PaymentSelection {
    pub fn validated(self) -> Result<Self, ValidationError> {
        if !self.method.is_mobile_money() {
            return Ok(Self { phone: None, ..self });
        }
        let phone = validate_phone(self.phone.as_deref().unwrap_or_default())?;
        Ok(Self {
            method: self.method,
            phone: Some(phone),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub full_name: String,
    pub phone: String,
    pub region: RegionCode,
    pub city: String,
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

impl DeliveryAddress {
    /// Check required fields and normalize the phone number
    pub fn validated(self) -> Result<Self, ValidationError> {
        require("full_name", &self.full_name)?;
        require("city", &self.city)?;
        require("street", &self.street)?;
        let phone = validate_phone(&self.phone)?;

        Ok(Self {
            full_name: self.full_name.trim().to_string(),
            phone,
            city: self.city.trim().to_string(),
            street: self.street.trim().to_string(),
            landmark: self
                .landmark
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            ..self
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTotals {
    pub subtotal: Fcfa,
    pub delivery_fee: Fcfa,
    pub coupon_discount: Fcfa,
    pub total: Fcfa,
}

impl CheckoutTotals {
    pub fn new(subtotal: Fcfa, delivery_fee: Fcfa, coupon_discount: Fcfa) -> Self {
        let coupon_discount = coupon_discount.clamp(0, subtotal.max(0));
        Self {
            subtotal,
            delivery_fee,
            coupon_discount,
            total: subtotal + delivery_fee - coupon_discount,
        }
    }
}

/// Transient state of one checkout, from delivery selection to placement
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub id: Uuid,
    pub items: Vec<CartLine>,
    pub buyer_region: RegionCode,
    pub seller_regions: BTreeSet<RegionCode>,
    pub home_model: PricingModel,
    pub subtotal: Fcfa,
    pub delivery: DeliveryQuote,
    pub coupon: Option<AppliedCoupon>,
    pub delivery_method: DeliveryMethod,
    pub address: Option<DeliveryAddress>,
    pub pickup_point_id: Option<String>,
    pub payment: Option<PaymentSelection>,
    pub step: CheckoutStep,
    pub processing: bool,
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(
        catalog: &Catalog,
        cart: &Cart,
        buyer_region: RegionCode,
        delivery_method: DeliveryMethod,
        home_model: PricingModel,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CartError::Empty.into());
        }

        let subtotal = cart.subtotal(catalog)?;
        let seller_regions = cart.seller_regions(catalog)?;
        let mut session = Self {
            id: Uuid::new_v4(),
            items: cart.lines().to_vec(),
            buyer_region,
            seller_regions,
            home_model,
            subtotal,
            delivery: quote_delivery(home_model, Destination::Home(buyer_region), std::iter::empty()),
            coupon: None,
            delivery_method,
            address: None,
            pickup_point_id: None,
            payment: None,
            step: CheckoutStep::Delivery,
            processing: false,
            created_at: Utc::now(),
        };
        session.reprice(catalog);
        Ok(session)
    }

    pub fn totals(&self) -> CheckoutTotals {
        CheckoutTotals::new(
            self.subtotal,
            self.delivery.fee,
            self.coupon.as_ref().map(|c| c.discount).unwrap_or(0),
        )
    }

    fn ensure_idle(&self) -> Result<(), CheckoutError> {
        if self.processing {
            return Err(CheckoutError::AlreadyProcessing);
        }
        Ok(())
    }

    /// Recompute the delivery quote for the current method and selection
    fn reprice(&mut self, catalog: &Catalog) {
        let sellers = self.seller_regions.iter().copied();
        self.delivery = match self.delivery_method {
            DeliveryMethod::Home => {
                let buyer = self.address.as_ref().map(|a| a.region).unwrap_or(self.buyer_region);
                quote_delivery(self.home_model, Destination::Home(buyer), sellers)
            }
            DeliveryMethod::Pickup => match self
                .pickup_point_id
                .as_deref()
                .and_then(|id| catalog.pickup_point(id))
            {
                Some(point) => quote_delivery(self.home_model, Destination::Pickup(point), sellers),
                None => DeliveryQuote {
                    method: DeliveryMethod::Pickup,
                    model: PricingModel::Distance,
                    fee: 0,
                    lines: Vec::new(),
                },
            },
        };
    }

    pub fn set_delivery_method(&mut self, catalog: &Catalog, method: DeliveryMethod) -> Result<(), CheckoutError> {
        self.ensure_idle()?;
        self.delivery_method = method;
        self.reprice(catalog);
        Ok(())
    }

    pub fn set_address(&mut self, catalog: &Catalog, address: DeliveryAddress) -> Result<(), CheckoutError> {
        self.ensure_idle()?;
        self.address = Some(address.validated()?);
        self.reprice(catalog);
        Ok(())
    }

    pub fn select_pickup_point(&mut self, catalog: &Catalog, pickup_point_id: &str) -> Result<(), CheckoutError> {
        self.ensure_idle()?;
        if catalog.pickup_point(pickup_point_id).is_none() {
            return Err(CheckoutError::UnknownPickupPoint(pickup_point_id.to_string()));
        }
        self.pickup_point_id = Some(pickup_point_id.to_string());
        self.reprice(catalog);
        Ok(())
    }

    pub fn set_payment(&mut self, payment: PaymentSelection) -> Result<(), CheckoutError> {
        self.ensure_idle()?;
        self.payment = Some(payment.validated()?);
        Ok(())
    }

    /// Apply a coupon against this checkout's subtotal, replacing any previous one
    pub fn apply_coupon(&mut self, catalog: &Catalog, code: &str) -> Result<AppliedCoupon, CheckoutError> {
        self.ensure_idle()?;
        let applied = evaluate_coupon(catalog, code, self.subtotal)?;
        self.coupon = Some(applied.clone());
        Ok(applied)
    }

    pub fn remove_coupon(&mut self) -> Result<Option<AppliedCoupon>, CheckoutError> {
        self.ensure_idle()?;
        Ok(self.coupon.take())
    }

    fn check_delivery_selected(&self) -> Result<(), CheckoutError> {
        match self.delivery_method {
            DeliveryMethod::Home if self.address.is_none() => Err(CheckoutError::MissingAddress),
            DeliveryMethod::Pickup if self.pickup_point_id.is_none() => {
                Err(CheckoutError::MissingPickupPoint)
            }
            _ => Ok(()),
        }
    }

    fn check_payment_selected(&self) -> Result<(), CheckoutError> {
        if self.payment.is_none() {
            return Err(CheckoutError::MissingPaymentMethod);
        }
        Ok(())
    }

    /// Move forward one step. On failure the step is left unchanged.
    pub fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_idle()?;
        let next = match self.step {
            CheckoutStep::Delivery => {
                self.check_delivery_selected()?;
                CheckoutStep::Payment
            }
            CheckoutStep::Payment => {
                self.check_payment_selected()?;
                CheckoutStep::Review
            }
            CheckoutStep::Review => return Err(CheckoutError::NoNextStep),
        };
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_idle()?;
        self.step = match self.step {
            CheckoutStep::Delivery | CheckoutStep::Payment => CheckoutStep::Delivery,
            CheckoutStep::Review => CheckoutStep::Payment,
        };
        Ok(self.step)
    }

    /// Mark the session as processing. Fails unless at review and idle, and
    /// re-checks the delivery and payment selections, which may have changed
    /// since those steps were passed.
    pub fn begin_placement(&mut self) -> Result<(), CheckoutError> {
        self.ensure_idle()?;
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::NotReadyToPlace);
        }
        self.check_delivery_selected()?;
        self.check_payment_selected()?;
        self.processing = true;
        Ok(())
    }

    pub fn abort_placement(&mut self) {
        self.processing = false;
    }
}

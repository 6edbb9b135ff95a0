use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::{Catalog, RegionCode};
use crate::checkout::{
    AppliedCoupon, Cart, CartLine, CheckoutError, CheckoutSession, CheckoutStep, CheckoutTotals,
    DeliveryAddress, Order, PaymentSelection,
};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::pricing::{DeliveryMethod, PricingModel};

#[derive(Debug, Clone, Deserialize)]
pub struct StartCheckoutRequest {
    pub items: Vec<CartLine>,
    pub buyer_region: RegionCode,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySelection {
    pub method: DeliveryMethod,
    #[serde(default)]
    pub address: Option<DeliveryAddress>,
    #[serde(default)]
    pub pickup_point_id: Option<String>,
}

/// Session plus its derived totals, as the screens render it
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutView {
    #[serde(flatten)]
    pub session: CheckoutSession,
    pub totals: CheckoutTotals,
}

impl From<&CheckoutSession> for CheckoutView {
    fn from(session: &CheckoutSession) -> Self {
        Self {
            totals: session.totals(),
            session: session.clone(),
        }
    }
}

/// Async front for the checkout flow. Sessions and placed orders live in memory.
#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<Catalog>,
    home_model: PricingModel,
    latency: Duration,
    timeout: Duration,
    sessions: Arc<RwLock<HashMap<Uuid, CheckoutSession>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl CheckoutService {
    pub fn new(catalog: Arc<Catalog>, config: &Config) -> Self {
        Self {
            catalog,
            home_model: config.home_pricing_model,
            latency: config.simulated_latency,
            timeout: config.request_timeout,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn home_model(&self) -> PricingModel {
        self.home_model
    }

    /// Run `work` after the configured latency, bounded by the request timeout.
    /// No lock may be held by the caller while this is awaited.
    pub async fn remote<T, F>(&self, work: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let latency = self.latency;
        tokio::time::timeout(self.timeout, async move {
            tokio::time::sleep(latency).await;
            work.await
        })
        .await
        .map_err(|_| AppError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)))?
    }

    async fn with_session<T, E, F>(&self, id: Uuid, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut CheckoutSession, &Catalog) -> Result<T, E>,
        AppError: From<E>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Checkout not found".to_string()))?;
        Ok(f(session, &self.catalog)?)
    }

    async fn view(&self, id: Uuid) -> AppResult<CheckoutView> {
        self.with_session(id, |s, _| Ok::<_, AppError>(CheckoutView::from(&*s)))
            .await
    }

    pub async fn start(&self, request: StartCheckoutRequest) -> AppResult<CheckoutView> {
        let cart = Cart::from_lines(&self.catalog, &request.items)?;
        let mut session = CheckoutSession::new(
            &self.catalog,
            &cart,
            request.buyer_region,
            request.delivery_method,
            self.home_model,
        )?;
        if let Some(code) = request.coupon_code.as_deref() {
            session.apply_coupon(&self.catalog, code)?;
        }

        let view = CheckoutView::from(&session);
        tracing::info!(
            checkout_id = %session.id,
            buyer_region = %session.buyer_region,
            subtotal = session.subtotal,
            "Checkout started"
        );
        self.sessions.write().await.insert(session.id, session);
        Ok(view)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<CheckoutView> {
        self.view(id).await
    }

    /// Discard a checkout. Not allowed while an order is being placed.
    pub async fn cancel(&self, id: Uuid) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            None => Err(AppError::NotFound("Checkout not found".to_string())),
            Some(s) if s.processing => Err(CheckoutError::AlreadyProcessing.into()),
            Some(_) => {
                sessions.remove(&id);
                tracing::debug!(checkout_id = %id, "Checkout discarded");
                Ok(())
            }
        }
    }

    pub async fn apply_coupon(&self, id: Uuid, code: &str) -> AppResult<AppliedCoupon> {
        // Fail fast on a missing or placing session before paying the latency
        if self.view(id).await?.session.processing {
            return Err(CheckoutError::AlreadyProcessing.into());
        }
        self.remote(async { Ok(()) }).await?;

        let applied = self
            .with_session(id, |s, catalog| s.apply_coupon(catalog, code))
            .await;
        match &applied {
            Ok(coupon) => tracing::info!(checkout_id = %id, code = %coupon.code, discount = coupon.discount, "Coupon applied"),
            Err(e) => tracing::debug!(checkout_id = %id, error = %e, "Coupon rejected"),
        }
        applied
    }

    pub async fn remove_coupon(&self, id: Uuid) -> AppResult<CheckoutView> {
        self.with_session(id, |s, _| {
            s.remove_coupon()?;
            Ok::<_, CheckoutError>(CheckoutView::from(&*s))
        })
        .await
    }

    pub async fn select_delivery(&self, id: Uuid, selection: DeliverySelection) -> AppResult<CheckoutView> {
        // Changes land on a draft so a rejected field leaves the session untouched
        self.with_session(id, |s, catalog| {
            let mut draft = s.clone();
            draft.set_delivery_method(catalog, selection.method)?;
            if let Some(address) = selection.address {
                draft.set_address(catalog, address)?;
            }
            if let Some(point) = selection.pickup_point_id.as_deref() {
                draft.select_pickup_point(catalog, point)?;
            }
            *s = draft;
            Ok::<_, CheckoutError>(CheckoutView::from(&*s))
        })
        .await
    }

    pub async fn select_payment(&self, id: Uuid, payment: PaymentSelection) -> AppResult<CheckoutView> {
        self.with_session(id, |s, _| {
            s.set_payment(payment)?;
            Ok::<_, CheckoutError>(CheckoutView::from(&*s))
        })
        .await
    }

    pub async fn advance(&self, id: Uuid) -> AppResult<CheckoutView> {
        self.with_session(id, |s, _| {
            let step = s.advance()?;
            tracing::debug!(checkout_id = %s.id, step = ?step, "Checkout advanced");
            Ok::<_, CheckoutError>(CheckoutView::from(&*s))
        })
        .await
    }

    pub async fn back(&self, id: Uuid) -> AppResult<CheckoutView> {
        self.with_session(id, |s, _| {
            s.back()?;
            Ok::<_, CheckoutError>(CheckoutView::from(&*s))
        })
        .await
    }

    /// Place the order for a reviewed checkout. The session is marked as
    /// processing for the duration, so a concurrent second attempt is rejected.
    pub async fn place_order(&self, id: Uuid) -> AppResult<Order> {
        self.with_session(id, |s, _| s.begin_placement()).await?;

        if let Err(e) = self.remote(async { Ok(()) }).await {
            tracing::warn!(checkout_id = %id, error = %e, "Order placement failed");
            // Session may have been removed meanwhile; nothing to reset then
            let _ = self
                .with_session(id, |s, _| {
                    s.abort_placement();
                    Ok::<_, AppError>(())
                })
                .await;
            return Err(e);
        }

        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("Checkout not found".to_string()))?;
        debug_assert_eq!(session.step, CheckoutStep::Review);

        let order = Order::from_session(&session);
        tracing::info!(
            order_id = %order.id,
            reference = %order.reference,
            total = order.totals.total,
            "Order placed"
        );
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    pub async fn order(&self, id: Uuid) -> AppResult<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::PaymentMethod;

    fn service(latency_ms: u64, timeout_ms: u64) -> CheckoutService {
        let config = Config {
            simulated_latency: Duration::from_millis(latency_ms),
            request_timeout: Duration::from_millis(timeout_ms),
            ..Config::default()
        };
        CheckoutService::new(Arc::new(Catalog::bundled().unwrap()), &config)
    }

    fn start_request() -> StartCheckoutRequest {
        StartCheckoutRequest {
            items: vec![CartLine { product_id: "p-pagne-wax".into(), quantity: 1 }],
            buyer_region: RegionCode::Ce,
            delivery_method: DeliveryMethod::Pickup,
            coupon_code: None,
        }
    }

    async fn reviewed(service: &CheckoutService) -> Uuid {
        let id = service.start(start_request()).await.unwrap().session.id;
        service
            .select_delivery(
                id,
                DeliverySelection {
                    method: DeliveryMethod::Pickup,
                    address: None,
                    pickup_point_id: Some("pp-yaounde-centre".into()),
                },
            )
            .await
            .unwrap();
        service.advance(id).await.unwrap();
        service
            .select_payment(id, PaymentSelection { method: PaymentMethod::MtnMobileMoney, phone: Some("670000000".into()) })
            .await
            .unwrap();
        service.advance(id).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_full_flow() {
        let service = service(0, 1000);
        let id = reviewed(&service).await;

        let coupon = service.apply_coupon(id, "livraison").await.unwrap();
        assert_eq!(coupon.discount, 1500);

        let order = service.place_order(id).await.unwrap();
        // Yaounde centre pickup is ~2 km from the CE centroid
        assert_eq!(order.totals.delivery_fee, 500);
        assert_eq!(order.totals.total, 12_500 + 500 - 1500);
        assert_eq!(order.coupon_code.as_deref(), Some("LIVRAISON"));
        assert_eq!(order.pickup_point_id.as_deref(), Some("pp-yaounde-centre"));

        assert!(matches!(service.get(id).await, Err(AppError::NotFound(_))));
        assert_eq!(service.order(order.id).await.unwrap().reference, order.reference);
    }

    #[tokio::test]
    async fn test_concurrent_placement_rejected() {
        let service = service(50, 1000);
        let id = reviewed(&service).await;

        let (first, second) = tokio::join!(service.place_order(id), service.place_order(id));
        let results = [first.is_ok(), second.is_ok()];
        assert_eq!(results.iter().filter(|ok| **ok).count(), 1);

        let failure = if first.is_err() { first } else { second };
        assert!(matches!(failure, Err(AppError::Checkout(CheckoutError::AlreadyProcessing))));
    }

    #[tokio::test]
    async fn test_timeout_clears_processing() {
        let service = service(100, 10);
        let id = reviewed(&service).await;

        assert!(matches!(service.place_order(id).await, Err(AppError::Timeout(10))));
        let view = service.get(id).await.unwrap();
        assert!(!view.session.processing);
        assert_eq!(view.session.step, CheckoutStep::Review);
    }

    #[tokio::test]
    async fn test_coupon_rejections_keep_session() {
        let service = service(0, 1000);
        let id = service.start(start_request()).await.unwrap().session.id;

        assert!(matches!(
            service.apply_coupon(id, "").await,
            Err(AppError::Checkout(CheckoutError::Coupon(_)))
        ));
        assert!(matches!(
            service.apply_coupon(Uuid::new_v4(), "LIVRAISON").await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.get(id).await.unwrap().session.coupon.is_none());
    }

    #[tokio::test]
    async fn test_step_guard_through_service() {
        let service = service(0, 1000);
        let mut request = start_request();
        request.delivery_method = DeliveryMethod::Home;
        let id = service.start(request).await.unwrap().session.id;

        assert!(matches!(
            service.advance(id).await,
            Err(AppError::Checkout(CheckoutError::MissingAddress))
        ));
        assert_eq!(service.get(id).await.unwrap().session.step, CheckoutStep::Delivery);
    }

    #[tokio::test]
    async fn test_cancel() {
        let service = service(0, 1000);
        let id = service.start(start_request()).await.unwrap().session.id;
        service.cancel(id).await.unwrap();
        assert!(matches!(service.cancel(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rejected_delivery_selection_leaves_session_untouched() {
        let service = service(0, 1000);
        let mut request = start_request();
        request.delivery_method = DeliveryMethod::Home;
        let id = service.start(request).await.unwrap().session.id;
        let address = DeliveryAddress {
            full_name: "Paul Essomba".into(),
            phone: "699001122".into(),
            region: RegionCode::Ce,
            city: "Yaoundé".into(),
            street: "Avenue Kennedy".into(),
            landmark: None,
        };
        service
            .select_delivery(
                id,
                DeliverySelection { method: DeliveryMethod::Home, address: Some(address), pickup_point_id: None },
            )
            .await
            .unwrap();
        let before = service.get(id).await.unwrap();

        let result = service
            .select_delivery(
                id,
                DeliverySelection {
                    method: DeliveryMethod::Pickup,
                    address: None,
                    pickup_point_id: Some("nope".into()),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(AppError::Checkout(CheckoutError::UnknownPickupPoint(_)))
        ));

        let after = service.get(id).await.unwrap();
        assert_eq!(after.session.delivery_method, DeliveryMethod::Home);
        assert_eq!(after.totals, before.totals);
        assert_eq!(after.session.pickup_point_id, None);
    }

    #[tokio::test]
    async fn test_coupon_rejected_during_placement() {
        let service = service(50, 1000);
        let id = reviewed(&service).await;

        let (placed, coupon) = tokio::join!(service.place_order(id), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            service.apply_coupon(id, "bienvenue10").await
        });

        let order = placed.unwrap();
        assert!(order.coupon_code.is_none());
        assert_eq!(order.totals.coupon_discount, 0);
        assert!(matches!(coupon, Err(AppError::Checkout(CheckoutError::AlreadyProcessing))));
    }
}

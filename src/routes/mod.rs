use axum::{
    routing::{get, post, put},
    Json, Router,
};

use crate::handlers::{cart, catalog, checkout, client, vendor};
use crate::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn create_router(state: AppState) -> Router {
    // Catalog browsing and vendor contact
    let catalog_routes = Router::new()
        .route("/regions", get(catalog::list_regions))
        .route("/pickup-points", get(catalog::list_pickup_points))
        .route("/products", get(catalog::list_products))
        .route("/vendors/{id}/contact", get(vendor::vendor_contact))
        .route("/vendors/{id}/messages", post(vendor::send_message));

    // Cart screen: stateless pricing
    let cart_routes = Router::new()
        .route("/delivery/quote", post(cart::delivery_quote))
        .route("/cart/quote", post(cart::cart_quote))
        .route("/coupons/validate", post(cart::validate_coupon));

    // Checkout wizard
    let checkout_routes = Router::new()
        .route("/", post(checkout::start_checkout))
        .route(
            "/{id}",
            get(checkout::get_checkout).delete(checkout::cancel_checkout),
        )
        .route(
            "/{id}/coupon",
            post(checkout::apply_coupon).delete(checkout::remove_coupon),
        )
        .route("/{id}/delivery", put(checkout::select_delivery))
        .route("/{id}/payment", put(checkout::select_payment))
        .route("/{id}/next", post(checkout::next_step))
        .route("/{id}/back", post(checkout::previous_step))
        .route("/{id}/place", post(checkout::place_order));

    // Preferences and PWA helpers
    let client_routes = Router::new()
        .route(
            "/settings/{client_id}",
            get(client::get_settings).put(client::update_settings),
        )
        .route("/pwa/affordances", post(client::pwa_affordances));

    let api_routes = Router::new()
        .merge(catalog_routes)
        .merge(cart_routes)
        .merge(client_routes)
        .route("/orders/{id}", get(checkout::get_order))
        .nest("/checkout", checkout_routes);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .with_state(state)
}

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use storefront_checkout::{
    catalog::Catalog, config::Config, routes::create_router, settings::SettingsStore, AppState,
};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(
        Config::default(),
        Catalog::bundled().unwrap(),
        SettingsStore::in_memory(),
    );
    create_router(state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_and_regions() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&app, Method::GET, "/api/regions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn pickup_points_sorted_by_distance() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::GET,
        "/api/pickup-points?region=lt&lat=4.09&lng=9.74",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["id"], "pp-douala-bonamoussadi");
    assert!(points[0]["distance_km"].as_f64().unwrap() < points[1]["distance_km"].as_f64().unwrap());

    let (status, _) = call(&app, Method::GET, "/api/pickup-points?region=XX", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::GET, "/api/pickup-points?lat=4.0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delivery_quote_uses_adjacency_for_home() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/delivery/quote",
        Some(json!({ "buyer_region": "CE", "seller_regions": ["CE", "LT", "EN", "LT"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "adjacency");
    assert_eq!(body["fee"], 1500 + 3000 + 5000);
    assert_eq!(body["lines"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn coupon_validation_errors_are_client_errors() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/coupons/validate",
        Some(json!({ "code": "livraison", "subtotal": 5000 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("minimum"));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/coupons/validate",
        Some(json!({ "code": "grande20", "subtotal": 25000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "code": "GRANDE20", "discount": 5000 }));
}

#[tokio::test]
async fn cart_quote_matches_total_invariant() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/cart/quote",
        Some(json!({
            "items": [
                { "product_id": "p-sac-cuir", "quantity": 1 },
                { "product_id": "p-cafe-arabica", "quantity": 2 }
            ],
            "buyer_region": "NO",
            "coupon_code": "GRANDE20"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let subtotal = body["subtotal"].as_i64().unwrap();
    let fee = body["delivery_fee"].as_i64().unwrap();
    let discount = body["coupon_discount"].as_i64().unwrap();
    assert_eq!(subtotal, 22_000 + 16_000);
    // NO same-region + OU far
    assert_eq!(fee, 1500 + 5000);
    assert_eq!(discount, 7600);
    assert_eq!(body["total"].as_i64().unwrap(), subtotal + fee - discount);
    assert_eq!(body["applied_coupon_code"], "GRANDE20");
}

#[tokio::test]
async fn checkout_wizard_end_to_end() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({
            "items": [{ "product_id": "p-poivre-penja", "quantity": 3 }],
            "buyer_region": "LT"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["step"], "delivery");
    let id = body["id"].as_str().unwrap().to_string();

    // Step guard: no address yet
    let (status, body) = call(&app, Method::POST, &format!("/api/checkout/{id}/next"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Please select a delivery address");
    let (_, body) = call(&app, Method::GET, &format!("/api/checkout/{id}"), None).await;
    assert_eq!(body["step"], "delivery");

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/checkout/{id}/delivery"),
        Some(json!({
            "method": "home",
            "address": {
                "full_name": "Jean Mbarga",
                "phone": "123",
                "region": "LT",
                "city": "Douala",
                "street": "Rue Njo-Njo"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/api/checkout/{id}/delivery"),
        Some(json!({
            "method": "home",
            "address": {
                "full_name": "Jean Mbarga",
                "phone": "+237 690 11 22 33",
                "region": "LT",
                "city": "Douala",
                "street": "Rue Njo-Njo"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["delivery_fee"], 1500);

    let (status, body) = call(&app, Method::POST, &format!("/api/checkout/{id}/next"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "payment");

    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/api/checkout/{id}/payment"),
        Some(json!({ "method": "orange_money", "phone": "690112233" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/api/checkout/{id}/coupon"),
        Some(json!({ "code": "bienvenue10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coupon"]["discount"], 1350);
    assert_eq!(body["totals"]["total"], 13_500 + 1500 - 1350);

    // Placing from payment is refused
    let (status, _) = call(&app, Method::POST, &format!("/api/checkout/{id}/place"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = call(&app, Method::POST, &format!("/api/checkout/{id}/next"), None).await;
    assert_eq!(body["step"], "review");

    let (status, order) = call(&app, Method::POST, &format!("/api/checkout/{id}/place"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["totals"]["total"], 13_650);
    assert!(order["reference"].as_str().unwrap().starts_with("CMD-"));

    let order_id = order["id"].as_str().unwrap();
    let (status, fetched) = call(&app, Method::GET, &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["reference"], order["reference"]);

    let (status, _) = call(&app, Method::GET, &format!("/api/checkout/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vendor_contact_and_messages() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/vendors/v-bafoussam-cafe/contact", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["options"].as_array().unwrap().iter().all(|o| o["enabled"] == false));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/vendors/v-yaounde-tissus/messages",
        Some(json!({ "body": "Avez-vous du bleu ?", "product_id": "p-pagne-wax" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["vendor_id"], "v-yaounde-tissus");

    let (status, _) = call(&app, Method::GET, "/api/vendors/ghost/contact", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_and_affordances() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/settings/device-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "fr");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/settings/device-1",
        Some(json!({ "language": "en", "install_prompt_dismissed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "en");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/pwa/affordances",
        Some(json!({
            "client_id": "device-1",
            "capabilities": { "service_worker": true, "notifications": "default", "online": false }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["install_prompt"], false);
    assert_eq!(body["notification_opt_in"], true);
    assert_eq!(body["offline_banner"], true);

    let (status, _) = call(&app, Method::GET, "/api/settings/bad%20id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

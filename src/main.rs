use std::net::SocketAddr;

use axum::middleware;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_checkout::{
    catalog::Catalog,
    config::Config,
    middleware::rate_limit::{create_global_governor, log_request},
    routes,
    settings::SettingsStore,
    AppError, AppResult, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_checkout=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        addr = %config.server_addr(),
        home_pricing = %config.home_pricing_model,
        latency_ms = u64::try_from(config.simulated_latency.as_millis()).unwrap_or(u64::MAX),
        "Starting storefront checkout"
    );

    let catalog = Catalog::load(config.catalog_path.as_deref())?;
    tracing::info!(
        products = catalog.products.len(),
        pickup_points = catalog.pickup_points.len(),
        coupons = catalog.coupons.len(),
        "Catalog loaded"
    );

    let settings = match &config.settings_path {
        Some(path) => SettingsStore::load(path).await?,
        None => {
            tracing::warn!("SETTINGS_PATH not set, preferences will not be persisted");
            SettingsStore::in_memory()
        }
    };

    let governor = create_global_governor(&config)?;
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| AppError::Internal(format!("Invalid address: {}", e)))?;

    let state = AppState::new(config, catalog, settings);

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(governor);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Internal(format!("Server error: {}", e)))
}

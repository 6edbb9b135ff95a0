pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pricing;
pub mod pwa;
pub mod routes;
pub mod services;
pub mod settings;
pub mod utils;

use std::sync::Arc;

use catalog::Catalog;
use services::{CheckoutService, MessagingService};
use settings::SettingsStore;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub checkout: CheckoutService,
    pub messaging: MessagingService,
    pub settings: Arc<SettingsStore>,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog, settings: SettingsStore) -> Self {
        let checkout = CheckoutService::new(Arc::new(catalog), &config);
        Self {
            messaging: MessagingService::new(checkout.clone()),
            checkout,
            settings: Arc::new(settings),
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.checkout.catalog()
    }
}

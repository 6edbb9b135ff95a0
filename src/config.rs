use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::pricing::PricingModel;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// JSON catalog replacing the bundled one
    pub catalog_path: Option<PathBuf>,
    /// Where client preferences are persisted; memory-only when unset
    pub settings_path: Option<PathBuf>,
    pub simulated_latency: Duration,
    pub request_timeout: Duration,
    pub home_pricing_model: PricingModel,
    pub rate_limit_per_ms: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            catalog_path: None,
            settings_path: None,
            simulated_latency: Duration::ZERO,
            request_timeout: Duration::from_millis(5000),
            home_pricing_model: PricingModel::Adjacency,
            rate_limit_per_ms: 60,
            rate_limit_burst: 1000,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
            catalog_path: env::var("CATALOG_PATH").ok().map(PathBuf::from),
            settings_path: env::var("SETTINGS_PATH").ok().map(PathBuf::from),
            simulated_latency: Duration::from_millis(parse_var("SIMULATED_LATENCY_MS", 800)?),
            request_timeout: Duration::from_millis(parse_var("REQUEST_TIMEOUT_MS", 5000)?),
            home_pricing_model: parse_var("DELIVERY_PRICING_MODEL", defaults.home_pricing_model)?,
            rate_limit_per_ms: parse_var("RATE_LIMIT_PER_MS", defaults.rate_limit_per_ms)?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Internal(format!("{} is invalid: {}", name, e))),
        Err(_) => Ok(default),
    }
}

use std::env;
use std::time::Duration;

const DEFAULT_ORDER_TIMEOUT_SECS: u64 = 5;

/// Settings for the external order-processing service. Built once at startup
/// and handed to the client at construction; nothing reads the environment
/// after that.
#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    pub base_url: String,
    pub auth_token: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub order_service: OrderServiceConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let order_service = OrderServiceConfig::from_env()?;
        Ok(Self {
            database_url,
            host,
            port,
            order_service,
        })
    }
}

impl OrderServiceConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("ORDER_SERVICE_BASEURL")?;
        let auth_token = env::var("ORDER_SERVICE_AUTHTOKEN")?;
        let timeout_secs = env::var("ORDER_SERVICE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_ORDER_TIMEOUT_SECS);
        Ok(Self {
            // Trailing slashes would double up when joining endpoint paths.
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

//! API server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use folio_shop::{NotifyMode, ShopConfig};

/// Secret used when `FOLIO_ENV=development` and no secret is set.
const DEV_JWT_SECRET: &str = "folio-dev-secret-change-in-production";

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,

    /// SQLite database file
    pub database_path: PathBuf,

    /// HS256 key for bearer tokens
    pub jwt_secret: String,

    /// Whether checkout waits for order handlers
    pub notify_mode: NotifyMode,

    /// Retries for transient storage errors
    pub store_retries: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `load` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let development = lookup("FOLIO_ENV").is_some_and(|v| v.eq_ignore_ascii_case("development"));

        let jwt_secret = match lookup("FOLIO_JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if development => DEV_JWT_SECRET.to_string(),
            None => return Err(ConfigError::MissingRequired("FOLIO_JWT_SECRET".to_string())),
        };

        Ok(ApiConfig {
            bind_addr: lookup("FOLIO_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:5001".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FOLIO_BIND_ADDR".to_string()))?,

            database_path: lookup("FOLIO_DATABASE_PATH")
                .unwrap_or_else(|| "./folio.db".to_string())
                .into(),

            jwt_secret,

            notify_mode: lookup("FOLIO_NOTIFY_MODE")
                .unwrap_or_else(|| "inline".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FOLIO_NOTIFY_MODE".to_string()))?,

            store_retries: lookup("FOLIO_STORE_RETRIES")
                .unwrap_or_else(|| "3".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("FOLIO_STORE_RETRIES".to_string()))?,
        })
    }

    pub fn shop_config(&self) -> ShopConfig {
        ShopConfig::default()
            .notify_mode(self.notify_mode)
            .max_retries(self.store_retries)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

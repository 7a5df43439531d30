//! # Folio API
//!
//! HTTP server for the bookstore checkout backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             Folio API                                   │
//! │                                                                         │
//! │  Storefront ──► axum (5001) ──► Caller (Bearer JWT) ──► ShopServices    │
//! │                                                             │           │
//! │                                                             ▼           │
//! │                                                      SqliteStore        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `FOLIO_BIND_ADDR` - listen address (default: 0.0.0.0:5001)
//! - `FOLIO_DATABASE_PATH` - SQLite file (default: ./folio.db)
//! - `FOLIO_JWT_SECRET` - HS256 secret for bearer tokens
//! - `FOLIO_ENV` - `development` allows a built-in JWT secret
//! - `FOLIO_NOTIFY_MODE` - `inline` | `background` (default: inline)
//! - `FOLIO_STORE_RETRIES` - retries for transient storage errors (default: 3)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use folio_db::Database;
use folio_shop::ShopServices;
use tracing_subscriber::EnvFilter;

pub use auth::{Caller, JwtManager};
pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::build_router;

/// Bearer token lifetime for tokens this server issues.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Shared application state.
pub struct AppState {
    pub shop: ShopServices,
    pub jwt: JwtManager,
    /// `None` when running over a non-SQL store.
    pub db: Option<Database>,
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio_db=debug,folio_shop=debug,folio_api=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

//! # Shop Error Types
//!
//! The one error taxonomy every cart, checkout, order and report operation
//! returns.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Caller         │  │   Input         │  │     Storage             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Unauthenticated│  │  NotFound       │  │  PersistenceFailure     │ │
//! │  │  Unauthorized   │  │  InvalidInput   │  │                         │ │
//! │  │                 │  │  EmptyCart      │  │                         │ │
//! │  │                 │  │  InvalidCartItem│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input errors never leave partial state behind. `PersistenceFailure` is
//! surfaced as-is; any retrying already happened inside the storage adapter.

use folio_core::{CoreError, ValidationError};
use folio_db::DbError;
use thiserror::Error;

/// Result type alias for shop operations.
pub type ShopResult<T> = Result<T, ShopError>;

#[derive(Debug, Error)]
pub enum ShopError {
    // =========================================================================
    // Caller Errors
    // =========================================================================
    /// No identity was presented.
    #[error("Authentication required")]
    Unauthenticated,

    /// The identity lacks the role for this operation.
    ///
    /// Deliberately carries no detail: a denied caller learns nothing about
    /// whether the data it asked for exists.
    #[error("Access denied")]
    Unauthorized,

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Unknown book, cart line or order.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Bad quantity, malformed id, disallowed status change.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Checkout on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line could not be priced at checkout.
    ///
    /// ## When This Occurs
    /// - The book was removed from the catalog after it was added
    /// - The catalog entry carries an unusable price
    #[error("Cart item {book_id} cannot be purchased: {reason}")]
    InvalidCartItem { book_id: String, reason: String },

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Storage unavailable or rejected the write. Nothing was applied.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl ShopError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ShopError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Stable machine-readable code for API bodies and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ShopError::Unauthenticated => "UNAUTHENTICATED",
            ShopError::Unauthorized => "UNAUTHORIZED",
            ShopError::NotFound { .. } => "NOT_FOUND",
            ShopError::InvalidInput(_) => "INVALID_INPUT",
            ShopError::EmptyCart => "EMPTY_CART",
            ShopError::InvalidCartItem { .. } => "INVALID_CART_ITEM",
            ShopError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }
}

impl From<CoreError> for ShopError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound(book_id) => ShopError::not_found("Cart line", book_id),
            CoreError::EmptyOrder => ShopError::EmptyCart,
            other => ShopError::InvalidInput(other.to_string()),
        }
    }
}

impl From<ValidationError> for ShopError {
    fn from(err: ValidationError) -> Self {
        ShopError::InvalidInput(err.to_string())
    }
}

impl From<DbError> for ShopError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ShopError::NotFound { entity, id },
            other => ShopError::PersistenceFailure(other.to_string()),
        }
    }
}

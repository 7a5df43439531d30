//! # Error Types
//!
//! Domain errors for folio-core.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  folio-core   ValidationError ──► CoreError                             │
//! │  folio-db     DbError                                                   │
//! │  folio-shop   ShopError  (Unauthenticated, NotFound, EmptyCart, ...)    │
//! │  apps/api     ApiError   (status code + JSON body)                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ShopError → ApiError → client      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::order::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the pure domain types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart has no line for the given book.
    ///
    /// ## When This Occurs
    /// - `Cart::update_quantity` on a book that was never added
    /// - The line was removed by an earlier request
    #[error("Cart line not found for book {0}")]
    LineNotFound(String),

    /// Cart already holds the maximum number of distinct books.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A line quantity would exceed the per-line maximum.
    ///
    /// ## When This Occurs
    /// - Adding to a line that is already near the cap
    /// - Updating a line to a very large quantity
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// An order cannot be built from zero lines.
    #[error("Cannot place an order with no items")]
    EmptyOrder,

    /// A line total or order total does not fit in an i64 of cents.
    #[error("Order total overflows")]
    TotalOverflow,

    /// The requested status change is not allowed from the current status.
    ///
    /// ## When This Occurs
    /// - Shipping a cancelled order
    /// - Moving a delivered order anywhere
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// e.g. an order id that is not a UUID.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

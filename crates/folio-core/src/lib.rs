//! # folio-core: Pure Domain for Folio
//!
//! Everything that must be true about money, carts and orders, expressed
//! as plain types and functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Folio Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/api (axum HTTP)                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     folio-shop  (CartStore, CheckoutEngine, Dispatcher, Gate)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   order   │  │   │
//! │  │   │ Identity  │  │   Money   │  │   Cart    │  │   Order   │  │   │
//! │  │   │   Book    │  │  (cents)  │  │ CartLine  │  │ OrderLine │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identity, Role, Book, SalesReport
//! - [`money`] - Integer-cent money
//! - [`cart`] - Cart and CartLine with add/update/remove rules
//! - [`order`] - Order, OrderLine, OrderStatus and its transitions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use folio_core::{Cart, Money, Order, OrderLine};
//!
//! let mut cart = Cart::new("user-1");
//! cart.add_line("B1", 2).unwrap();
//!
//! let lines = cart
//!     .lines
//!     .iter()
//!     .map(|l| OrderLine::new(&l.book_id, l.quantity, Money::from_cents(1000)))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let order = Order::place("user-1", lines, Utc::now()).unwrap();
//! assert_eq!(order.total_cents, 2000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{Order, OrderLine, OrderStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct books in one cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single book in one line.
///
/// Catches fat-finger input (1000 instead of 10) before it reaches checkout.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Longest accepted book id.
pub const MAX_BOOK_ID_LEN: usize = 64;

//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  folio-shop port            SQLite repository                           │
//! │  ───────────────            ─────────────────                           │
//! │  Catalog                ──► BookRepository   (books)                    │
//! │  CartRepository         ──► CartRepository   (cart_items)               │
//! │  OrderRepository        ──► OrderRepository  (orders, order_items)      │
//! │  SalesAggregator        ──► OrderRepository::sales_summary              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod book;
pub mod cart;
pub mod order;

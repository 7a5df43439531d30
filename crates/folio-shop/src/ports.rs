//! # Storage Ports
//!
//! The seams between shop services and whatever holds the data.
//!
//! ```text
//!   CartStore ──► Catalog, CartRepository
//!   CheckoutEngine ──► Catalog, CartRepository, OrderRepository
//!   OrderDesk ──► OrderRepository
//!   ReportGate ──► SalesAggregator
//!
//!   Implementations: memory::InMemoryStore, sqlite::SqliteStore
//! ```
//!
//! Every port returns [`ShopResult`]; adapters translate their own failures
//! into `PersistenceFailure` (after retrying what is worth retrying).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{Book, Cart, Money, Order, OrderStatus, SalesReport};

use crate::error::ShopResult;

/// Read access to the book catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn find(&self, book_id: &str) -> ShopResult<Option<Book>>;

    /// Current unit price, `None` when the book no longer exists.
    async fn price_of(&self, book_id: &str) -> ShopResult<Option<Money>> {
        Ok(self.find(book_id).await?.map(|b| b.price()))
    }

    async fn list(&self) -> ShopResult<Vec<Book>>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The user's cart, empty if none was ever saved.
    async fn load(&self, user_id: &str) -> ShopResult<Cart>;
    async fn save(&self, cart: &Cart) -> ShopResult<()>;
    async fn clear(&self, user_id: &str) -> ShopResult<()>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists `order` and empties its owner's cart as one unit.
    ///
    /// On error neither effect is visible.
    async fn commit(&self, order: &Order) -> ShopResult<()>;

    async fn get(&self, order_id: &str) -> ShopResult<Option<Order>>;

    /// A user's orders, newest first.
    async fn list_for_user(&self, user_id: &str) -> ShopResult<Vec<Order>>;

    /// Every order, newest first.
    async fn list_all(&self) -> ShopResult<Vec<Order>>;

    /// Moves `order_id` from `from` to `to`.
    ///
    /// Fails with `InvalidInput` if the stored status is no longer `from`.
    async fn set_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> ShopResult<()>;
}

#[async_trait]
pub trait SalesAggregator: Send + Sync {
    async fn sales_report(&self) -> ShopResult<SalesReport>;
}

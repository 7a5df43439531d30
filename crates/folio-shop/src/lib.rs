//! # Folio Shop
//!
//! Cart, checkout, notifications and reporting for the Folio bookstore.
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              ShopServices                               │
//! │                                                                         │
//! │  CartStore ──────────► CheckoutEngine ──────► NotificationDispatcher    │
//! │  (per-user locks)      (atomic commit)        (AdminAlert, Inventory..) │
//! │                                                                         │
//! │  OrderDesk             ReportGate                                       │
//! │  (history, status)     (admin sales totals)                             │
//! │                                                                         │
//! │  ── ports ─────────────────────────────────────────────────────────     │
//! │  Catalog · CartRepository · OrderRepository · SalesAggregator           │
//! │  implemented by InMemoryStore and SqliteStore                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use folio_core::Identity;
//! use folio_shop::{InMemoryStore, ShopConfig, ShopServices};
//!
//! # async fn demo() -> folio_shop::ShopResult<()> {
//! let store = InMemoryStore::with_books(&[("B1", "Dune", 1000)]).await;
//! let shop = ShopServices::from_store(store, ShopConfig::default());
//!
//! let alice = Identity::member("alice");
//! shop.carts.add_line(&alice, "B1", 2).await?;
//! let order = shop.checkout.checkout(&alice).await?;
//! assert_eq!(order.total_cents, 2000);
//! # Ok(())
//! # }
//! ```

pub mod cart_store;
pub mod checkout;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod orders;
pub mod ports;
pub mod report;
pub mod sqlite;

use std::sync::Arc;

pub use cart_store::{CartGuard, CartStore};
pub use checkout::CheckoutEngine;
pub use config::{NotifyMode, RetryPolicy, ShopConfig};
pub use dispatcher::{HandlerError, NotificationDispatcher, OrderHandler, PublishReport, SubscriptionId};
pub use error::{ShopError, ShopResult};
pub use handlers::{AdminAlert, InventorySimulation};
pub use memory::InMemoryStore;
pub use orders::OrderDesk;
pub use ports::{CartRepository, Catalog, OrderRepository, SalesAggregator};
pub use report::ReportGate;
pub use sqlite::SqliteStore;

/// Every shop service, wired to one backing store.
#[derive(Clone)]
pub struct ShopServices {
    pub catalog: Arc<dyn Catalog>,
    pub carts: Arc<CartStore>,
    pub checkout: Arc<CheckoutEngine>,
    pub orders: Arc<OrderDesk>,
    pub reports: Arc<ReportGate>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl ShopServices {
    /// Builds the services over a store that implements all four ports.
    pub fn from_store<S>(store: S, config: ShopConfig) -> Self
    where
        S: Catalog + CartRepository + OrderRepository + SalesAggregator + 'static,
    {
        let store = Arc::new(store);
        let catalog: Arc<dyn Catalog> = store.clone();
        let carts_repo: Arc<dyn CartRepository> = store.clone();
        let orders_repo: Arc<dyn OrderRepository> = store.clone();
        let sales: Arc<dyn SalesAggregator> = store;

        let dispatcher = Arc::new(NotificationDispatcher::new());
        let carts = Arc::new(CartStore::new(Arc::clone(&catalog), carts_repo));
        let checkout = Arc::new(CheckoutEngine::new(
            Arc::clone(&carts),
            Arc::clone(&catalog),
            Arc::clone(&orders_repo),
            Arc::clone(&dispatcher),
            config,
        ));

        ShopServices {
            catalog,
            carts,
            checkout,
            orders: Arc::new(OrderDesk::new(orders_repo)),
            reports: Arc::new(ReportGate::new(sales)),
            dispatcher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::Identity;
    use folio_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_end_to_end_over_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = chrono::Utc::now();
        db.books()
            .insert(&folio_core::Book {
                id: "B1".into(),
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                price_cents: 1000,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let shop = ShopServices::from_store(
            SqliteStore::new(db.clone(), RetryPolicy::default()),
            ShopConfig::default(),
        );
        let inventory = Arc::new(InventorySimulation::new());
        shop.dispatcher.subscribe(inventory.clone()).await;

        let alice = Identity::member("alice");
        shop.carts.add_line(&alice, "B1", 2).await.unwrap();
        let order = shop.checkout.checkout(&alice).await.unwrap();

        assert_eq!(order.total_cents, 2000);
        assert!(shop.carts.get(&alice).await.unwrap().is_empty());
        assert_eq!(inventory.reserved("B1"), 2);

        db.books().update_price("B1", 5000).await.unwrap();
        let history = shop.orders.history(&alice).await.unwrap();
        assert_eq!(history[0].total_cents, 2000);

        let report = shop
            .reports
            .get_report(Some(&Identity::admin("root")))
            .await
            .unwrap();
        assert_eq!(report.total_revenue_cents, 2000);
        assert_eq!(report.number_of_orders, 1);
    }
}

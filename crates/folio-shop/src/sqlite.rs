//! # SQLite Store
//!
//! Implements the ports on top of `folio-db`.
//!
//! ```text
//!   port call ──► repository call ──┬── Ok ─────────────────────► Ok
//!                                   ├── transient (busy, pool) ──► backoff, retry
//!                                   └── anything else ───────────► ShopError
//! ```
//!
//! Retries stop after `RetryPolicy::max_retries`; the last error is
//! returned as `PersistenceFailure`.

use std::future::Future;

use async_trait::async_trait;
use backoff::backoff::Backoff;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use folio_core::{Book, Cart, Money, Order, OrderStatus, SalesReport};
use folio_db::{Database, DbError, DbResult};

use crate::config::RetryPolicy;
use crate::error::{ShopError, ShopResult};
use crate::ports::{CartRepository, Catalog, OrderRepository, SalesAggregator};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
    retry: RetryPolicy,
}

impl SqliteStore {
    pub fn new(db: Database, retry: RetryPolicy) -> Self {
        SqliteStore { db, retry }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// Runs `op` until it succeeds, fails permanently, or the retry budget is
/// spent.
pub(crate) async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    name: &'static str,
    mut op: F,
) -> ShopResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut backoff = policy.backoff();
    let mut attempt = 0u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = backoff.next_backoff().unwrap_or(policy.max_interval);
                warn!(op = name, attempt, ?delay, error = %e, "Transient storage error, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if !matches!(e, DbError::NotFound { .. }) {
                    warn!(op = name, attempts = attempt + 1, error = %e, "Storage operation failed");
                }
                return Err(e.into());
            }
        }
    }
}

#[async_trait]
impl Catalog for SqliteStore {
    async fn find(&self, book_id: &str) -> ShopResult<Option<Book>> {
        let books = self.db.books();
        let books = &books;
        retry_transient(&self.retry, "book.find", move || books.get_by_id(book_id)).await
    }

    async fn price_of(&self, book_id: &str) -> ShopResult<Option<Money>> {
        let books = self.db.books();
        let books = &books;
        let cents = retry_transient(&self.retry, "book.price", move || books.price_of(book_id)).await?;
        Ok(cents.map(Money::from_cents))
    }

    async fn list(&self) -> ShopResult<Vec<Book>> {
        let books = self.db.books();
        let books = &books;
        retry_transient(&self.retry, "book.list", move || books.list()).await
    }
}

#[async_trait]
impl CartRepository for SqliteStore {
    async fn load(&self, user_id: &str) -> ShopResult<Cart> {
        let carts = self.db.carts();
        let carts = &carts;
        retry_transient(&self.retry, "cart.load", move || carts.load(user_id)).await
    }

    async fn save(&self, cart: &Cart) -> ShopResult<()> {
        let carts = self.db.carts();
        let carts = &carts;
        retry_transient(&self.retry, "cart.save", move || carts.save(cart)).await
    }

    async fn clear(&self, user_id: &str) -> ShopResult<()> {
        let carts = self.db.carts();
        let carts = &carts;
        retry_transient(&self.retry, "cart.clear", move || carts.clear(user_id)).await
    }
}

#[async_trait]
impl OrderRepository for SqliteStore {
    async fn commit(&self, order: &Order) -> ShopResult<()> {
        let orders = self.db.orders();
        let orders = &orders;
        retry_transient(&self.retry, "order.commit", move || {
            orders.insert_and_clear_cart(order)
        })
        .await
    }

    async fn get(&self, order_id: &str) -> ShopResult<Option<Order>> {
        let orders = self.db.orders();
        let orders = &orders;
        retry_transient(&self.retry, "order.get", move || orders.get_by_id(order_id)).await
    }

    async fn list_for_user(&self, user_id: &str) -> ShopResult<Vec<Order>> {
        let orders = self.db.orders();
        let orders = &orders;
        retry_transient(&self.retry, "order.history", move || orders.list_for_user(user_id)).await
    }

    async fn list_all(&self) -> ShopResult<Vec<Order>> {
        let orders = self.db.orders();
        let orders = &orders;
        retry_transient(&self.retry, "order.list_all", move || orders.list_all()).await
    }

    async fn set_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> ShopResult<()> {
        let orders = self.db.orders();
        let repo = &orders;
        let result = retry_transient(&self.retry, "order.status", move || {
            repo.transition_status(order_id, from, to, at)
        })
        .await;

        match result {
            // The guarded update matched nothing: either the order is gone or
            // its status moved underneath us.
            Err(ShopError::NotFound { .. }) => match self.get(order_id).await? {
                Some(current) => {
                    debug!(order_id, current = %current.status, expected = %from, "Status changed concurrently");
                    Err(ShopError::InvalidInput(format!(
                        "Order {} is {}, not {}",
                        order_id, current.status, from
                    )))
                }
                None => Err(ShopError::not_found("Order", order_id)),
            },
            other => other,
        }
    }
}

#[async_trait]
impl SalesAggregator for SqliteStore {
    async fn sales_report(&self) -> ShopResult<SalesReport> {
        let orders = self.db.orders();
        let orders = &orders;
        let (revenue, count) =
            retry_transient(&self.retry, "order.sales", move || orders.sales_summary()).await?;

        Ok(SalesReport {
            total_revenue_cents: revenue,
            number_of_orders: count,
            generated_at: Utc::now(),
        })
    }
}

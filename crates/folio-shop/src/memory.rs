//! # In-Memory Store
//!
//! All four ports over one shared state. Used by tests and demos.
//!
//! Books, carts and orders live behind a single `RwLock`, so `commit`
//! inserts the order and clears the cart under one write guard. The store
//! can be switched "offline" to exercise storage-failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use folio_core::{Book, Cart, Order, OrderStatus, SalesReport};

use crate::error::{ShopError, ShopResult};
use crate::ports::{CartRepository, Catalog, OrderRepository, SalesAggregator};

#[derive(Debug, Default)]
struct MemoryState {
    books: HashMap<String, Book>,
    carts: HashMap<String, Cart>,
    /// Insertion order; newest last.
    orders: Vec<Order>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with `(id, title, price_cents)` entries.
    pub async fn with_books(books: &[(&str, &str, i64)]) -> Self {
        let store = Self::new();
        for (id, title, price_cents) in books {
            store.put_book(book(id, title, *price_cents)).await;
        }
        store
    }

    /// Inserts or replaces a catalog entry.
    pub async fn put_book(&self, book: Book) {
        self.state.write().await.books.insert(book.id.clone(), book);
    }

    pub async fn remove_book(&self, book_id: &str) -> bool {
        self.state.write().await.books.remove(book_id).is_some()
    }

    pub async fn set_price(&self, book_id: &str, price_cents: i64) -> bool {
        let mut state = self.state.write().await;
        match state.books.get_mut(book_id) {
            Some(book) => {
                book.price_cents = price_cents;
                book.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// While offline every port call fails with `PersistenceFailure`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    fn ensure_online(&self) -> ShopResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ShopError::PersistenceFailure("store is offline".into()));
        }
        Ok(())
    }
}

fn book(id: &str, title: &str, price_cents: i64) -> Book {
    let now = Utc::now();
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: String::new(),
        price_cents,
        created_at: now,
        updated_at: now,
    }
}

fn newest_first<'a>(orders: impl DoubleEndedIterator<Item = &'a Order>) -> Vec<Order> {
    // Reverse insertion order first so equal timestamps still list newest first.
    let mut out: Vec<Order> = orders.rev().cloned().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[async_trait]
impl Catalog for InMemoryStore {
    async fn find(&self, book_id: &str) -> ShopResult<Option<Book>> {
        self.ensure_online()?;
        Ok(self.state.read().await.books.get(book_id).cloned())
    }

    async fn list(&self) -> ShopResult<Vec<Book>> {
        self.ensure_online()?;
        let mut books: Vec<Book> = self.state.read().await.books.values().cloned().collect();
        books.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(books)
    }
}

#[async_trait]
impl CartRepository for InMemoryStore {
    async fn load(&self, user_id: &str) -> ShopResult<Cart> {
        self.ensure_online()?;
        Ok(self
            .state
            .read()
            .await
            .carts
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| Cart::new(user_id)))
    }

    async fn save(&self, cart: &Cart) -> ShopResult<()> {
        self.ensure_online()?;
        self.state
            .write()
            .await
            .carts
            .insert(cart.user_id.clone(), cart.clone());
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> ShopResult<()> {
        self.ensure_online()?;
        self.state.write().await.carts.remove(user_id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn commit(&self, order: &Order) -> ShopResult<()> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        if state.orders.iter().any(|o| o.id == order.id) {
            return Err(ShopError::PersistenceFailure(format!(
                "order {} already exists",
                order.id
            )));
        }
        state.orders.push(order.clone());
        state.carts.remove(&order.user_id);
        Ok(())
    }

    async fn get(&self, order_id: &str) -> ShopResult<Option<Order>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> ShopResult<Vec<Order>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(newest_first(
            state.orders.iter().filter(|o| o.user_id == user_id),
        ))
    }

    async fn list_all(&self) -> ShopResult<Vec<Order>> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(newest_first(state.orders.iter()))
    }

    async fn set_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> ShopResult<()> {
        self.ensure_online()?;
        let mut state = self.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| ShopError::not_found("Order", order_id))?;

        if order.status != from {
            return Err(ShopError::InvalidInput(format!(
                "Order {} is {}, not {}",
                order_id, order.status, from
            )));
        }
        order.status = to;
        order.updated_at = at;
        Ok(())
    }
}

#[async_trait]
impl SalesAggregator for InMemoryStore {
    async fn sales_report(&self) -> ShopResult<SalesReport> {
        self.ensure_online()?;
        let state = self.state.read().await;
        let sales = state.orders.iter().filter(|o| o.status.counts_as_sale());

        let mut revenue: i64 = 0;
        let mut count: i64 = 0;
        for order in sales {
            revenue = revenue.checked_add(order.total_cents).ok_or_else(|| {
                ShopError::PersistenceFailure("revenue total overflowed".into())
            })?;
            count += 1;
        }

        Ok(SalesReport {
            total_revenue_cents: revenue,
            number_of_orders: count,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{Money, OrderLine};

    fn order_for(user: &str, cents: i64) -> Order {
        let line = OrderLine::new("B1", 1, Money::from_cents(cents)).unwrap();
        Order::place(user, vec![line], Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_commit_clears_only_owner_cart() {
        let store = InMemoryStore::new();
        let mut a = Cart::new("a");
        a.add_line("B1", 1).unwrap();
        let mut b = Cart::new("b");
        b.add_line("B1", 2).unwrap();
        store.save(&a).await.unwrap();
        store.save(&b).await.unwrap();

        store.commit(&order_for("a", 100)).await.unwrap();

        assert!(CartRepository::load(&store, "a").await.unwrap().is_empty());
        assert_eq!(CartRepository::load(&store, "b").await.unwrap(), b);
        assert_eq!(store.order_count().await, 1);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = InMemoryStore::with_books(&[("B1", "Dune", 1000)]).await;
        store.set_offline(true);

        assert!(matches!(
            store.find("B1").await,
            Err(ShopError::PersistenceFailure(_))
        ));
        assert!(store.commit(&order_for("a", 1)).await.is_err());
        assert_eq!(store.order_count().await, 0);

        store.set_offline(false);
        assert!(store.find("B1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_set_status_checks_current_status() {
        let store = InMemoryStore::new();
        let order = order_for("a", 100);
        store.commit(&order).await.unwrap();

        store
            .set_status(&order.id, OrderStatus::Pending, OrderStatus::Shipped, Utc::now())
            .await
            .unwrap();
        let err = store
            .set_status(&order.id, OrderStatus::Pending, OrderStatus::Cancelled, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidInput(_)));

        let err = store
            .set_status("missing", OrderStatus::Pending, OrderStatus::Shipped, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_sales_report_skips_cancelled() {
        let store = InMemoryStore::new();
        let kept = order_for("a", 1500);
        let cancelled = order_for("a", 900);
        store.commit(&kept).await.unwrap();
        store.commit(&cancelled).await.unwrap();
        store
            .set_status(&cancelled.id, OrderStatus::Pending, OrderStatus::Cancelled, Utc::now())
            .await
            .unwrap();

        let report = store.sales_report().await.unwrap();
        assert_eq!(report.total_revenue_cents, 1500);
        assert_eq!(report.number_of_orders, 1);
    }

    #[tokio::test]
    async fn test_list_sorted_by_title() {
        let store =
            InMemoryStore::with_books(&[("2", "pride", 1), ("1", "Dune", 1), ("3", "1984", 1)])
                .await;
        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }
}
